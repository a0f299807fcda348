use serde::{Deserialize, Serialize};

use super::lenient;
use crate::workflows::codes::{SalaryType, WorkRuleType};

/// One deduction or bonus line as a remote source returns it.
///
/// Every field a source may omit is optional and every field is read
/// leniently, so a malformed line is kept rather than rejected; consumers
/// decide how to default it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    #[serde(
        default,
        deserialize_with = "lenient::identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_report_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_applied: bool,
}

impl LedgerRecord {
    /// Amount used for totals; absent amounts count as zero.
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.filter(|amount| amount.is_finite()).unwrap_or(0.0)
    }

    /// Identifier when it carries any content.
    pub fn non_empty_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Reason with surrounding whitespace removed, absent when blank.
    pub fn trimmed_reason(&self) -> Option<&str> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
    }
}

/// Numeric payroll summary computed by the backend and narrated here.
///
/// Unreadable figures count as zero and unknown codes as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationBreakdown {
    #[serde(deserialize_with = "lenient::figure")]
    pub base_salary: f64,
    #[serde(deserialize_with = "lenient::figure")]
    pub expected_hours: f64,
    #[serde(deserialize_with = "lenient::figure")]
    pub worked_hours: f64,
    #[serde(deserialize_with = "lenient::figure")]
    pub overtime_hours: f64,
    #[serde(deserialize_with = "lenient::figure")]
    pub overtime_rate: f64,
    #[serde(deserialize_with = "lenient::figure")]
    pub overtime_payment: f64,
    #[serde(deserialize_with = "lenient::figure")]
    pub total_deductions_amount: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub deductions_count: u32,
    #[serde(deserialize_with = "lenient::figure")]
    pub total_bonuses_amount: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub bonuses_count: u32,
    #[serde(deserialize_with = "lenient::figure")]
    pub gross_salary: f64,
    #[serde(deserialize_with = "lenient::figure")]
    pub net_salary: f64,
    #[serde(
        deserialize_with = "lenient::salary_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_type: Option<SalaryType>,
    #[serde(
        deserialize_with = "lenient::work_rule_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_rule_type: Option<WorkRuleType>,
}

/// Report body returned by the payroll report endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollReportPayload {
    #[serde(default)]
    pub deductions: Option<Vec<LedgerRecord>>,
    #[serde(default)]
    pub deduction_details: Option<Vec<LedgerRecord>>,
    #[serde(default, alias = "calculationBreakdown")]
    pub calculation: CalculationBreakdown,
}

impl PayrollReportPayload {
    pub fn deductions(&self) -> &[LedgerRecord] {
        self.deductions.as_deref().unwrap_or_default()
    }

    pub fn deduction_details(&self) -> &[LedgerRecord] {
        self.deduction_details.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ledger_record_tolerates_missing_and_textual_fields() {
        let record: LedgerRecord = serde_json::from_value(json!({
            "id": 12,
            "reason": "  Late arrival ",
            "amount": "1,250.50",
            "salaryReportId": "77",
            "isApplied": null
        }))
        .expect("lenient record");

        assert_eq!(record.non_empty_id(), Some("12"));
        assert_eq!(record.trimmed_reason(), Some("Late arrival"));
        assert_eq!(record.amount, Some(1250.5));
        assert_eq!(record.salary_report_id.as_deref(), Some("77"));
        assert!(record.date.is_none());
        assert!(!record.is_applied);
    }

    #[test]
    fn unparseable_amount_counts_as_zero() {
        let record: LedgerRecord =
            serde_json::from_value(json!({ "amount": "n/a", "isApplied": "yes" }))
                .expect("lenient record");

        assert!(record.amount.is_none());
        assert_eq!(record.amount_or_zero(), 0.0);
        assert!(record.is_applied);
    }

    #[test]
    fn payload_treats_null_collections_as_empty() {
        let payload: PayrollReportPayload = serde_json::from_value(json!({
            "deductions": null,
            "calculation": { "baseSalary": 3000, "salaryType": "1", "workRuleType": 3 }
        }))
        .expect("payload parses");

        assert!(payload.deductions().is_empty());
        assert!(payload.deduction_details().is_empty());
        assert_eq!(payload.calculation.base_salary, 3000.0);
        assert_eq!(payload.calculation.salary_type, Some(SalaryType::Monthly));
        assert_eq!(payload.calculation.work_rule_type, Some(WorkRuleType::Shift));
    }

    #[test]
    fn badly_typed_values_do_not_reject_the_payload() {
        let payload: PayrollReportPayload = serde_json::from_value(json!({
            "deductions": [
                { "id": 1, "reason": "Late", "date": 20240111, "amount": 20 },
                { "id": 2, "reason": "Loan", "date": "2024-01-05", "isApplied": "pending" },
                { "id": 3, "reason": true, "date": { "day": 3 }, "amount": [1], "isApplied": {} }
            ],
            "calculation": {
                "baseSalary": "3,000",
                "overtimeHours": null,
                "deductionsCount": "2",
                "bonusesCount": -4,
                "netSalary": false,
                "salaryType": "weekly",
                "workRuleType": 2.5
            }
        }))
        .expect("lenient payload");

        let records = payload.deductions();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date.as_deref(), Some("20240111"));
        assert!(!records[1].is_applied);
        assert!(records[2].reason.is_none());
        assert!(records[2].date.is_none());
        assert!(records[2].amount.is_none());

        let calculation = &payload.calculation;
        assert_eq!(calculation.base_salary, 3000.0);
        assert_eq!(calculation.overtime_hours, 0.0);
        assert_eq!(calculation.deductions_count, 2);
        assert_eq!(calculation.bonuses_count, 0);
        assert_eq!(calculation.net_salary, 0.0);
        assert!(calculation.salary_type.is_none());
        assert!(calculation.work_rule_type.is_none());
    }
}
