use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;
use std::ops::Deref;

use super::super::domain::LedgerRecord;

/// A ledger record that survived deduplication.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReconciledRecord(LedgerRecord);

impl ReconciledRecord {
    pub fn record(&self) -> &LedgerRecord {
        &self.0
    }

    /// Point in time used for ordering; absent or unparseable dates map to
    /// the Unix epoch.
    pub fn sort_instant(&self) -> NaiveDateTime {
        self.0
            .date
            .as_deref()
            .and_then(parse_record_date)
            .unwrap_or_default()
    }
}

impl Deref for ReconciledRecord {
    type Target = LedgerRecord;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RecordKey {
    Id(String),
    Content {
        reason: String,
        date: Option<String>,
        amount: Option<u64>,
    },
}

fn record_key(record: &LedgerRecord) -> RecordKey {
    if let Some(id) = record.non_empty_id() {
        return RecordKey::Id(id.to_string());
    }

    RecordKey::Content {
        reason: record.trimmed_reason().unwrap_or_default().to_string(),
        date: record.date.clone(),
        // +0.0 and -0.0 are the same amount.
        amount: record
            .amount
            .map(|amount| if amount == 0.0 { 0 } else { amount.to_bits() }),
    }
}

/// Merge two overlapping collections into one deduplicated, date-ordered
/// sequence.
///
/// Records sharing an id, or lacking one and sharing reason, raw date and
/// amount, collapse to the first seen (`primary` before `secondary`). The
/// date sort is stable, so equal dates keep merge order.
pub fn merge(primary: &[LedgerRecord], secondary: &[LedgerRecord]) -> Vec<ReconciledRecord> {
    let mut seen = HashSet::new();
    let mut survivors: Vec<ReconciledRecord> = primary
        .iter()
        .chain(secondary)
        .filter(|record| seen.insert(record_key(record)))
        .cloned()
        .map(ReconciledRecord)
        .collect();

    survivors.sort_by_key(ReconciledRecord::sort_instant);
    survivors
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO date or timestamp into a naive UTC instant.
pub fn parse_record_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Some(dt) = TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn same_id_keeps_the_first_seen_record() {
        let primary = vec![record(Some("5"), "Late", "2024-01-10", 20.0)];
        let secondary = vec![record(Some("5"), "Late", "2024-01-10", 99.0)];

        let merged = merge(&primary, &secondary);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].amount, Some(20.0));
    }

    #[test]
    fn records_without_id_collapse_on_content() {
        let primary = vec![record(None, "Uniform", "2024-02-01", 15.0)];
        let secondary = vec![record(None, " Uniform ", "2024-02-01", 15.0)];

        let merged = merge(&primary, &secondary);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].reason.as_deref(), Some("Uniform"));
    }

    #[test]
    fn content_key_uses_raw_date_text() {
        let primary = vec![record(None, "Uniform", "2024-02-01", 15.0)];
        let secondary = vec![record(None, "Uniform", "2024-02-01T00:00:00Z", 15.0)];

        assert_eq!(merge(&primary, &secondary).len(), 2);
    }

    #[test]
    fn id_and_content_keys_never_collide() {
        let with_id = record(Some("9"), "Late", "2024-01-10", 20.0);
        let without_id = record(None, "Late", "2024-01-10", 20.0);

        assert_eq!(merge(&[with_id], &[without_id]).len(), 2);
    }

    #[test]
    fn blank_ids_fall_back_to_content_keys() {
        let blank = record(Some("  "), "Late", "2024-01-10", 20.0);
        let missing = record(None, "Late", "2024-01-10", 20.0);

        assert_eq!(merge(&[blank], &[missing]).len(), 1);
    }

    #[test]
    fn orders_by_date_and_keeps_ties_stable() {
        let primary = vec![
            record(Some("1"), "b", "2024-03-05", 1.0),
            record(Some("2"), "a", "2024-03-01T08:30:00Z", 1.0),
            record(Some("3"), "c", "2024-03-05", 1.0),
        ];
        let secondary = vec![record(Some("4"), "d", "2024-03-05", 1.0)];

        let merged = merge(&primary, &secondary);

        let ids: Vec<&str> = merged
            .iter()
            .map(|record| record.non_empty_id().expect("id present"))
            .collect();
        assert_eq!(ids, vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn undated_records_sort_as_epoch_and_are_kept() {
        let mut undated = record(Some("u"), "Loan", "", 50.0);
        undated.date = None;
        let garbage = record(Some("g"), "Loan", "next tuesday", 50.0);
        let ancient = record(Some("a"), "Loan", "1969-12-31", 50.0);
        let recent = record(Some("r"), "Loan", "2024-01-01", 50.0);

        let merged = merge(&[recent, undated, garbage], &[ancient]);

        let ids: Vec<&str> = merged
            .iter()
            .map(|record| record.non_empty_id().expect("id present"))
            .collect();
        assert_eq!(ids, vec!["a", "u", "g", "r"]);
    }

    #[test]
    fn minute_and_space_separated_timestamps_sort_as_instants() {
        let merged = merge(
            &[
                record(Some("b"), "Late", "2024-01-10T08:00", 5.0),
                record(Some("c"), "Late", "2024-01-10 08:00:00", 5.0),
                record(Some("d"), "Late", "2024-01-10 07:15", 5.0),
            ],
            &[record(Some("a"), "Late", "2024-01-05", 5.0)],
        );

        let ids: Vec<&str> = merged
            .iter()
            .map(|record| record.non_empty_id().expect("id present"))
            .collect();
        assert_eq!(ids, vec!["a", "d", "b", "c"]);
        assert_eq!(
            parse_record_date("2024-01-10T08:00"),
            parse_record_date("2024-01-10 08:00:00.000")
        );
    }

    #[test]
    fn inputs_are_left_untouched() {
        let primary = vec![
            record(Some("2"), "b", "2024-03-05", 1.0),
            record(Some("1"), "a", "2024-03-01", 1.0),
        ];
        let snapshot = primary.clone();

        let _ = merge(&primary, &primary);

        assert_eq!(primary, snapshot);
    }
}
