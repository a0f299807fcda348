//! Ledger reconciliation for payroll reports: merge the two deduction
//! collections, group them by reason and narrate the calculation breakdown.

pub mod domain;
mod import;
pub mod ledger;
mod lenient;
pub mod report;
mod router;

pub use domain::{CalculationBreakdown, LedgerRecord, PayrollReportPayload};
pub use import::{LedgerCsvImporter, LedgerImportError};
pub use ledger::{
    group_by_reason, merge, CategoryGroup, CategoryKey, ReasonGroups, ReconciledRecord,
};
pub use report::{
    reconcile_and_summarize, LedgerTotals, PayrollSummary, Statement, StatementKind,
};
pub use router::payroll_router;
