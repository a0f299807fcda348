mod format;
mod narrative;
mod summary;

pub use format::{format_hours, format_money};
pub use narrative::{compose, Statement, StatementKind, StatementTopic};
pub use summary::{reconcile_and_summarize, LedgerTotals, PayrollSummary};
