use crate::infra::{load_report, InMemoryRoster};
use clap::Args;
use serde_json::json;
use staffdesk::config::{AssignmentConfig, PayrollConfig};
use staffdesk::error::AppError;
use staffdesk::workflows::assignments::{
    AssignmentError, AssignmentKind, AssignmentService, BatchReport, CandidateMember, MemberId,
    TargetId,
};
use staffdesk::workflows::payroll::report::{format_money, Statement};
use staffdesk::workflows::payroll::{reconcile_and_summarize, PayrollReportPayload, PayrollSummary};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PayrollSummaryArgs {
    /// Saved payroll report payload (JSON)
    #[arg(long)]
    pub(crate) report: PathBuf,
    /// CSV export replacing the report's `deductions` collection
    #[arg(long)]
    pub(crate) deductions_csv: Option<PathBuf>,
    /// CSV export replacing the report's `deductionDetails` collection
    #[arg(long)]
    pub(crate) details_csv: Option<PathBuf>,
    /// Currency code used when rendering amounts (defaults to APP_CURRENCY, then USD)
    #[arg(long)]
    pub(crate) currency: Option<String>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Currency code used when rendering amounts (defaults to APP_CURRENCY, then USD)
    #[arg(long)]
    pub(crate) currency: Option<String>,
    /// Skip the batch assignment portion of the demo.
    #[arg(long)]
    pub(crate) skip_assignments: bool,
    /// Skip the payroll reconciliation portion of the demo.
    #[arg(long)]
    pub(crate) skip_payroll: bool,
}

pub(crate) fn run_payroll_summary(args: PayrollSummaryArgs) -> Result<(), AppError> {
    let PayrollSummaryArgs {
        report,
        deductions_csv,
        details_csv,
        currency,
        json,
    } = args;

    let config = payroll_config(currency.as_deref())?;
    let payload = load_report(&report, deductions_csv.as_deref(), details_csv.as_deref())?;
    let summary = reconcile_and_summarize(&payload, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_payroll_summary(&summary);
    }

    Ok(())
}

/// An explicit `--currency` wins over the environment.
fn payroll_config(currency: Option<&str>) -> Result<PayrollConfig, AppError> {
    let config = match currency {
        Some(code) => PayrollConfig::new(code)?,
        None => PayrollConfig::from_env()?,
    };
    Ok(config)
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        currency,
        skip_assignments,
        skip_payroll,
    } = args;

    let config = payroll_config(currency.as_deref())?;

    println!("Staffdesk demo");

    if !skip_assignments {
        println!("\nBatch assignment (shift 1 holds three members)");
        let service = AssignmentService::new(
            Arc::new(InMemoryRoster::seeded()),
            AssignmentConfig::default(),
        );

        let candidates = vec![
            CandidateMember::named(1, "Amal"),
            CandidateMember::named(3, "Bruno"),
            CandidateMember::named(4, "Chen"),
        ];
        render_batch(
            service
                .assign(AssignmentKind::Shift, TargetId(1), &candidates)
                .await,
        );

        let leavers = [MemberId(3), MemberId(8)];
        render_batch(
            service
                .unassign(AssignmentKind::WorkRule, TargetId(1), &leavers)
                .await,
        );

        render_batch(
            service
                .assign(
                    AssignmentKind::WorkRule,
                    TargetId(2),
                    &[CandidateMember::new(5), CandidateMember::new(6)],
                )
                .await,
        );
    }

    if skip_payroll {
        return Ok(());
    }

    println!("\nPayroll ledger reconciliation");
    let payload: PayrollReportPayload = serde_json::from_value(sample_report())?;
    let summary = reconcile_and_summarize(&payload, &config);
    render_payroll_summary(&summary);

    Ok(())
}

fn render_batch(outcome: Result<BatchReport, AssignmentError>) {
    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            println!("- Batch not started: {}", err);
            return;
        }
    };

    let attempted = join_ids(&report.attempted_member_ids);
    println!(
        "- {} {} {} -> members [{}]",
        report.action.label(),
        report.kind,
        report.target_id,
        attempted
    );
    if !report.skipped_member_ids.is_empty() {
        println!(
            "  Skipped (already assigned): [{}]",
            join_ids(&report.skipped_member_ids)
        );
    }

    match report.result.first_failure_message.as_deref() {
        None => println!("  All {} calls succeeded", report.result.attempted),
        Some(message) => println!(
            "  {} of {} calls failed: {}",
            report.result.failed, report.result.attempted, message
        ),
    }
}

fn join_ids(ids: &[MemberId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_payroll_summary(summary: &PayrollSummary) {
    let currency = summary.currency.as_str();

    println!("Ledger ({} records)", summary.totals.record_count);
    for record in &summary.records {
        println!(
            "  - {:<10} | {:<20} | {:>14} | {}",
            record.date.as_deref().unwrap_or("-"),
            record.trimmed_reason().unwrap_or("-"),
            format_money(record.amount_or_zero(), currency),
            if record.is_applied { "applied" } else { "pending" }
        );
    }
    println!(
        "  Total {} | applied {} | pending {}",
        format_money(summary.totals.total_amount, currency),
        format_money(summary.totals.applied_amount, currency),
        format_money(summary.totals.pending_amount, currency)
    );

    println!("By reason:");
    for group in &summary.groups {
        println!(
            "  - {}: {} ({} {})",
            group.key.as_str(),
            format_money(group.total_amount, currency),
            group.count,
            if group.count == 1 { "entry" } else { "entries" }
        );
    }

    println!("Breakdown:");
    for statement in &summary.narrative {
        println!("{}", narrative_line(statement));
    }
}

fn narrative_line(statement: &Statement) -> String {
    let marker = if statement.is_final() { '=' } else { '-' };
    format!("  {} {:<12} {}", marker, statement.topic.label(), statement.text)
}

fn sample_report() -> serde_json::Value {
    json!({
        "deductions": [
            { "id": 101, "reason": "Late arrival", "date": "2024-03-04", "amount": 25, "salaryReportId": 9, "isApplied": true },
            { "id": 102, "reason": "Equipment loan", "date": "2024-03-01", "amount": "150.00", "salaryReportId": 9, "isApplied": false }
        ],
        "deductionDetails": [
            { "id": "101", "reason": "Late arrival", "date": "2024-03-04", "amount": 40, "isApplied": true },
            { "reason": "Late arrival", "date": "2024-03-12", "amount": 15, "isApplied": true },
            { "reason": "Late arrival", "date": "2024-03-12", "amount": 15, "isApplied": true },
            { "reason": "", "date": "2024-03-15", "amount": 10 }
        ],
        "calculation": {
            "baseSalary": 3200,
            "expectedHours": 168,
            "workedHours": 174.5,
            "overtimeHours": 6.5,
            "overtimeRate": 28,
            "overtimePayment": 182,
            "totalDeductionsAmount": 200,
            "deductionsCount": 4,
            "totalBonusesAmount": 0,
            "bonusesCount": 0,
            "grossSalary": 3382,
            "netSalary": 3182,
            "salaryType": 1,
            "workRuleType": "shift"
        }
    })
}
