use serde::Serialize;
use tracing::info;

use super::narrative::{compose, Statement};
use crate::config::PayrollConfig;
use crate::workflows::payroll::domain::PayrollReportPayload;
use crate::workflows::payroll::ledger::{group_by_reason, merge, ReasonGroups, ReconciledRecord};

/// Everything a report view renders: table rows, chips and the breakdown text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub currency: String,
    pub records: Vec<ReconciledRecord>,
    pub groups: ReasonGroups,
    pub narrative: Vec<Statement>,
    pub totals: LedgerTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub record_count: usize,
    pub total_amount: f64,
    pub applied_amount: f64,
    pub pending_amount: f64,
}

impl LedgerTotals {
    pub fn from_records(records: &[ReconciledRecord]) -> Self {
        records
            .iter()
            .fold(LedgerTotals::default(), |mut totals, record| {
                let amount = record.amount_or_zero();
                totals.record_count += 1;
                totals.total_amount += amount;
                if record.is_applied {
                    totals.applied_amount += amount;
                } else {
                    totals.pending_amount += amount;
                }
                totals
            })
    }
}

/// Merge both ledger collections of a report, group them and narrate the
/// calculation breakdown.
#[tracing::instrument(
    skip(payload, config),
    fields(
        deductions = payload.deductions().len(),
        deduction_details = payload.deduction_details().len()
    )
)]
pub fn reconcile_and_summarize(
    payload: &PayrollReportPayload,
    config: &PayrollConfig,
) -> PayrollSummary {
    let records = merge(payload.deductions(), payload.deduction_details());
    let groups = group_by_reason(&records);
    let narrative = compose(&payload.calculation, &config.currency);
    let totals = LedgerTotals::from_records(&records);

    info!(
        records = totals.record_count,
        groups = groups.len(),
        "payroll report reconciled"
    );

    PayrollSummary {
        currency: config.currency.clone(),
        records,
        groups,
        narrative,
        totals,
    }
}
