//! Field deserializers for report payloads that never reject a value.
//!
//! Remote sources mix numbers, numeric strings, nulls and the odd boolean in
//! the same field. A value that cannot be read becomes absent (or zero for
//! breakdown figures) so one bad line never fails the whole payload.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::workflows::codes::{RawCode, SalaryType, WorkRuleType};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Loose {
    fn as_amount(&self) -> Option<f64> {
        match self {
            Loose::Integer(value) => Some(*value as f64),
            Loose::Number(value) => Some(*value).filter(|value| value.is_finite()),
            Loose::Text(text) => parse_amount(text),
            Loose::Bool(_) | Loose::Other(_) => None,
        }
    }

    fn into_raw_code(self) -> Option<RawCode> {
        match self {
            Loose::Integer(value) => Some(RawCode::Number(value)),
            Loose::Number(value) if value.is_finite() && value.fract() == 0.0 => {
                Some(RawCode::Number(value as i64))
            }
            Loose::Text(text) => Some(RawCode::Text(text)),
            _ => None,
        }
    }
}

fn loose<'de, D>(deserializer: D) -> Result<Option<Loose>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Loose>::deserialize(deserializer)
}

/// Parse a textual amount, tolerating thousands separators and whitespace.
pub(crate) fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse the textual flags backends and spreadsheet exports use.
pub(crate) fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Numbers keep their textual form; blank text is absent.
pub(crate) fn identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose(deserializer)?.and_then(|value| match value {
        Loose::Integer(value) => Some(value.to_string()),
        Loose::Number(value) if value.is_finite() => Some(value.to_string()),
        Loose::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }))
}

/// Free text kept raw; numbers such as the date `20240111` keep their digits.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose(deserializer)?.and_then(|value| match value {
        Loose::Text(text) => Some(text),
        Loose::Integer(value) => Some(value.to_string()),
        Loose::Number(value) if value.is_finite() => Some(value.to_string()),
        _ => None,
    }))
}

pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose(deserializer)?.and_then(|value| value.as_amount()))
}

/// Unrecognised flags read as not applied.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match loose(deserializer)? {
        Some(Loose::Bool(value)) => value,
        Some(Loose::Integer(value)) => value != 0,
        Some(Loose::Number(value)) => value != 0.0 && value.is_finite(),
        Some(Loose::Text(text)) => parse_flag(&text).unwrap_or(false),
        Some(Loose::Other(_)) | None => false,
    })
}

/// Breakdown figure; anything unreadable counts as zero.
pub(crate) fn figure<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose(deserializer)?
        .and_then(|value| value.as_amount())
        .unwrap_or(0.0))
}

pub(crate) fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = loose(deserializer)?
        .and_then(|value| value.as_amount())
        .unwrap_or(0.0);
    Ok(if value > 0.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    })
}

pub(crate) fn salary_type<'de, D>(deserializer: D) -> Result<Option<SalaryType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose(deserializer)?
        .and_then(Loose::into_raw_code)
        .and_then(|code| SalaryType::from_code(&code)))
}

pub(crate) fn work_rule_type<'de, D>(deserializer: D) -> Result<Option<WorkRuleType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose(deserializer)?
        .and_then(Loose::into_raw_code)
        .and_then(|code| WorkRuleType::from_code(&code)))
}
