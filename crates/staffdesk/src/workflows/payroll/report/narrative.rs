use serde::Serialize;

use super::format::{format_hours, format_money};
use crate::workflows::payroll::domain::CalculationBreakdown;

/// Differences below half a cent of an hour read as equal.
const HOURS_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Plain,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementTopic {
    BaseSalary,
    Hours,
    Overtime,
    Deductions,
    Bonuses,
    Net,
}

impl StatementTopic {
    pub const fn ordered() -> [StatementTopic; 6] {
        [
            StatementTopic::BaseSalary,
            StatementTopic::Hours,
            StatementTopic::Overtime,
            StatementTopic::Deductions,
            StatementTopic::Bonuses,
            StatementTopic::Net,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            StatementTopic::BaseSalary => "Base salary",
            StatementTopic::Hours => "Hours",
            StatementTopic::Overtime => "Overtime",
            StatementTopic::Deductions => "Deductions",
            StatementTopic::Bonuses => "Bonuses",
            StatementTopic::Net => "Net salary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub topic: StatementTopic,
    pub kind: StatementKind,
    pub text: String,
}

impl Statement {
    fn plain(topic: StatementTopic, text: String) -> Self {
        Self {
            topic,
            kind: StatementKind::Plain,
            text,
        }
    }

    pub fn is_final(&self) -> bool {
        self.kind == StatementKind::Final
    }
}

/// Narrate a calculation breakdown as six statements in a fixed order.
///
/// The overtime, deductions and bonuses statements each pick between a
/// present and an absent variant on a strict `> 0` threshold. The last
/// statement is always the final net salary line.
pub fn compose(breakdown: &CalculationBreakdown, currency: &str) -> Vec<Statement> {
    let money = |amount: f64| format_money(amount, currency);

    vec![
        Statement::plain(StatementTopic::BaseSalary, base_salary(breakdown, &money)),
        Statement::plain(StatementTopic::Hours, hours(breakdown)),
        Statement::plain(StatementTopic::Overtime, overtime(breakdown, &money)),
        Statement::plain(
            StatementTopic::Deductions,
            if breakdown.total_deductions_amount > 0.0 {
                format!(
                    "Deductions {} were applied.",
                    counted(
                        breakdown.total_deductions_amount,
                        breakdown.deductions_count,
                        &money
                    )
                )
            } else {
                "No deductions were applied.".to_string()
            },
        ),
        Statement::plain(
            StatementTopic::Bonuses,
            if breakdown.total_bonuses_amount > 0.0 {
                format!(
                    "Bonuses {} were added.",
                    counted(
                        breakdown.total_bonuses_amount,
                        breakdown.bonuses_count,
                        &money
                    )
                )
            } else {
                "No bonuses were added.".to_string()
            },
        ),
        Statement {
            topic: StatementTopic::Net,
            kind: StatementKind::Final,
            text: format!(
                "Net salary: gross {} - deductions {} + bonuses {} = {}.",
                money(breakdown.gross_salary),
                money(breakdown.total_deductions_amount),
                money(breakdown.total_bonuses_amount),
                money(breakdown.net_salary)
            ),
        },
    ]
}

fn base_salary(breakdown: &CalculationBreakdown, money: &impl Fn(f64) -> String) -> String {
    match breakdown.salary_type {
        Some(salary_type) => format!(
            "Base salary is {} ({} salary).",
            money(breakdown.base_salary),
            salary_type.label()
        ),
        None => format!("Base salary is {}.", money(breakdown.base_salary)),
    }
}

fn hours(breakdown: &CalculationBreakdown) -> String {
    let rule = breakdown
        .work_rule_type
        .map(|rule| format!(" under a {} work rule", rule.label()))
        .unwrap_or_default();
    let difference = breakdown.worked_hours - breakdown.expected_hours;
    let balance = if difference.abs() < HOURS_TOLERANCE {
        "matching the expected hours".to_string()
    } else if difference < 0.0 {
        format!("a deficit of {} hours", format_hours(-difference))
    } else {
        format!("a surplus of {} hours", format_hours(difference))
    };

    format!(
        "Worked {} of {} expected hours{rule}, {balance}.",
        format_hours(breakdown.worked_hours),
        format_hours(breakdown.expected_hours)
    )
}

fn overtime(breakdown: &CalculationBreakdown, money: &impl Fn(f64) -> String) -> String {
    if breakdown.overtime_hours > 0.0 {
        format!(
            "Overtime of {} hours at {} per hour adds {}.",
            format_hours(breakdown.overtime_hours),
            money(breakdown.overtime_rate),
            money(breakdown.overtime_payment)
        )
    } else {
        "No overtime was recorded for this period.".to_string()
    }
}

fn counted(total: f64, count: u32, money: &impl Fn(f64) -> String) -> String {
    match count {
        0 => format!("totalling {}", money(total)),
        1 => format!("of {} across 1 entry", money(total)),
        n => format!("of {} across {n} entries", money(total)),
    }
}
