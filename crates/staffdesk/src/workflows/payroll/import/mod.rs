mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::LedgerRecord;

#[derive(Debug, thiserror::Error)]
pub enum LedgerImportError {
    #[error("failed to read ledger export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ledger CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a recognised applied flag")]
    InvalidFlag { row: usize, value: String },
}

/// Reads deduction ledgers exported as CSV with the columns `Id`, `Reason`,
/// `Date`, `Amount`, `Salary Report Id` and `Applied`.
pub struct LedgerCsvImporter;

impl LedgerCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LedgerRecord>, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LedgerRecord>, LedgerImportError> {
        parser::parse_records(reader)
    }
}
