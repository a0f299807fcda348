use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::normalizer::clean_cell;
use super::LedgerImportError;
use crate::workflows::payroll::domain::LedgerRecord;
use crate::workflows::payroll::lenient::{parse_amount, parse_flag};

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<LedgerRecord>, LedgerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<LedgerRow>().enumerate() {
        let row = row?;
        // Line 1 holds the headers.
        let line = index + 2;
        records.push(row.into_record(line)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    #[serde(rename = "Id", default, deserialize_with = "cleaned")]
    id: Option<String>,
    #[serde(rename = "Reason", default, deserialize_with = "cleaned")]
    reason: Option<String>,
    #[serde(rename = "Date", default, deserialize_with = "cleaned")]
    date: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "cleaned")]
    amount: Option<String>,
    #[serde(rename = "Salary Report Id", default, deserialize_with = "cleaned")]
    salary_report_id: Option<String>,
    #[serde(rename = "Applied", default, deserialize_with = "cleaned")]
    applied: Option<String>,
}

impl LedgerRow {
    fn into_record(self, line: usize) -> Result<LedgerRecord, LedgerImportError> {
        let is_applied = match self.applied.as_deref() {
            None => false,
            Some(text) => parse_flag(text).ok_or_else(|| LedgerImportError::InvalidFlag {
                row: line,
                value: text.to_string(),
            })?,
        };

        Ok(LedgerRecord {
            id: self.id,
            reason: self.reason,
            date: self.date,
            amount: self.amount.as_deref().and_then(parse_amount),
            salary_report_id: self.salary_report_id,
            is_applied,
        })
    }
}

fn cleaned<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(clean_cell))
}
