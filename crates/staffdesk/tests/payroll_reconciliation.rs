use serde_json::json;
use staffdesk::config::PayrollConfig;
use staffdesk::workflows::payroll::report::StatementTopic;
use staffdesk::workflows::payroll::{
    group_by_reason, merge, reconcile_and_summarize, CalculationBreakdown, CategoryKey,
    LedgerCsvImporter, LedgerRecord, PayrollReportPayload,
};

fn record(id: Option<&str>, reason: &str, date: &str, amount: f64) -> LedgerRecord {
    LedgerRecord {
        id: id.map(str::to_string),
        reason: Some(reason.to_string()),
        date: Some(date.to_string()),
        amount: Some(amount),
        ..LedgerRecord::default()
    }
}

#[test]
fn first_seen_record_wins_for_shared_id() {
    let merged = merge(
        &[record(Some("5"), "Late", "2024-01-10", 20.0)],
        &[record(Some("5"), "Late", "2024-01-10", 99.0)],
    );

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].amount, Some(20.0));
}

#[test]
fn identical_records_without_id_collapse() {
    let merged = merge(
        &[record(None, "Late", "2024-01-10", 20.0)],
        &[record(None, "Late", "2024-01-10", 20.0)],
    );

    assert_eq!(merged.len(), 1);
}

#[test]
fn merge_is_idempotent_and_keeps_every_unique_key() {
    let primary = vec![
        record(Some("1"), "Late", "2024-01-12", 10.0),
        record(None, "Loan", "2024-01-03", 300.0),
    ];
    let secondary = vec![
        record(Some("1"), "Late", "2024-01-12", 10.0),
        record(Some("2"), "Tools", "2024-01-01", 42.0),
        record(None, "Loan", "2024-01-03", 300.0),
        record(None, "Loan", "2024-01-04", 300.0),
    ];

    let once = merge(&primary, &secondary);
    let flattened: Vec<LedgerRecord> = once.iter().map(|r| r.record().clone()).collect();
    let twice = merge(&flattened, &flattened);

    assert_eq!(once.len(), 4);
    assert_eq!(once, twice);
    let dates: Vec<&str> = once.iter().filter_map(|r| r.date.as_deref()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-03", "2024-01-04", "2024-01-12"]);
}

#[test]
fn group_totals_match_the_merged_sum() {
    let merged = merge(
        &[
            record(Some("1"), "Late", "2024-01-12", 10.5),
            record(Some("2"), "Loan", "2024-01-03", 300.0),
            record(Some("3"), "", "2024-01-05", 7.25),
        ],
        &[record(Some("4"), "Late", "2024-01-13", 4.5)],
    );

    let groups = group_by_reason(&merged);

    let grouped: f64 = groups.iter().map(|group| group.total_amount).sum();
    let direct: f64 = merged.iter().map(|r| r.amount_or_zero()).sum();
    assert!((grouped - direct).abs() < 1e-9);
    let late = groups
        .get(&CategoryKey::Reason("Late".to_string()))
        .expect("late group");
    assert_eq!(late.count, 2);
    assert!(groups.get(&CategoryKey::Unspecified).is_some());
}

#[test]
fn narrative_for_bonus_only_breakdown() {
    let payload = PayrollReportPayload {
        calculation: CalculationBreakdown {
            overtime_hours: 0.0,
            total_deductions_amount: 0.0,
            total_bonuses_amount: 150.0,
            bonuses_count: 1,
            ..CalculationBreakdown::default()
        },
        ..PayrollReportPayload::default()
    };

    let summary = reconcile_and_summarize(&payload, &PayrollConfig::default());

    assert_eq!(summary.narrative.len(), 6);
    assert_eq!(summary.narrative[2].topic, StatementTopic::Overtime);
    assert!(summary.narrative[2].text.contains("No overtime"));
    assert!(summary.narrative[3].text.contains("No deductions"));
    assert!(summary.narrative[4].text.contains("150.00 USD"));
    assert!(summary.narrative[5].is_final());
}

#[test]
fn report_payload_from_json_reconciles_end_to_end() {
    let payload: PayrollReportPayload = serde_json::from_value(json!({
        "deductions": [
            { "id": 5, "reason": "Late", "date": "2024-01-10", "amount": 20, "isApplied": true }
        ],
        "deductionDetails": [
            { "id": "5", "reason": "Late", "date": "2024-01-10", "amount": 99 },
            { "reason": "Loan", "date": "2024-01-02", "amount": "300" },
            { "reason": "Loan", "date": "2024-01-02", "amount": "300" }
        ],
        "calculation": {
            "baseSalary": 2500,
            "expectedHours": 160,
            "workedHours": 160,
            "totalDeductionsAmount": 320,
            "deductionsCount": 2,
            "grossSalary": 2500,
            "netSalary": 2180,
            "salaryType": "monthly"
        }
    }))
    .expect("payload parses");

    let summary = reconcile_and_summarize(&payload, &PayrollConfig::new("eur").expect("currency"));

    assert_eq!(summary.records.len(), 2);
    assert_eq!(summary.totals.record_count, 2);
    assert!((summary.totals.applied_amount - 20.0).abs() < 1e-9);
    assert!((summary.totals.pending_amount - 300.0).abs() < 1e-9);
    assert_eq!(
        summary.narrative[0].text,
        "Base salary is 2,500.00 EUR (monthly salary)."
    );
    assert_eq!(
        summary.narrative[5].text,
        "Net salary: gross 2,500.00 EUR - deductions 320.00 EUR + bonuses 0.00 EUR = 2,180.00 EUR."
    );
}

#[test]
fn csv_exports_feed_the_same_merge() {
    let deductions = "Id,Reason,Date,Amount,Salary Report Id,Applied\n\
1,Late,2024-01-10,20,9,yes\n";
    let details = "Id,Reason,Date,Amount,Salary Report Id,Applied\n\
1,Late,2024-01-10,99,9,yes\n\
,Tools,2024-01-05,15.5,9,no\n";

    let primary = LedgerCsvImporter::from_reader(deductions.as_bytes()).expect("deductions");
    let secondary = LedgerCsvImporter::from_reader(details.as_bytes()).expect("details");
    let merged = merge(&primary, &secondary);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].reason.as_deref(), Some("Tools"));
    assert_eq!(merged[1].amount, Some(20.0));
}
