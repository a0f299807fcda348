//! Backend enum codes that arrive either as numbers or as strings.
//!
//! Each code is normalized once when a payload is deserialized; the rest of
//! the crate only ever sees the closed enums.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw wire value of a code before it is matched against a closed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCode {
    Number(i64),
    Text(String),
}

impl RawCode {
    /// Numeric view of the code; numeric strings such as `"2"` count.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Text view of the code, only for values that are not numeric.
    pub fn as_name(&self) -> Option<String> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) if text.trim().parse::<i64>().is_ok() => None,
            Self::Text(text) => Some(text.trim().to_ascii_lowercase()),
        }
    }
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "'{text}'"),
        }
    }
}

struct RawCodeVisitor;

impl<'de> Visitor<'de> for RawCodeVisitor {
    type Value = RawCode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string code")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(RawCode::Number(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .map(RawCode::Number)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if value.fract() == 0.0 && value.is_finite() {
            Ok(RawCode::Number(value as i64))
        } else {
            Err(E::invalid_value(Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(RawCode::Text(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for RawCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawCodeVisitor)
    }
}

/// How an employee's base salary is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryType {
    Monthly,
    Hourly,
    Daily,
}

impl SalaryType {
    pub fn from_code(code: &RawCode) -> Option<Self> {
        if let Some(number) = code.as_number() {
            return match number {
                1 => Some(Self::Monthly),
                2 => Some(Self::Hourly),
                3 => Some(Self::Daily),
                _ => None,
            };
        }

        match code.as_name()?.as_str() {
            "monthly" | "month" => Some(Self::Monthly),
            "hourly" | "hour" => Some(Self::Hourly),
            "daily" | "day" => Some(Self::Daily),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

impl<'de> Deserialize<'de> for SalaryType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = RawCode::deserialize(deserializer)?;
        Self::from_code(&code)
            .ok_or_else(|| de::Error::custom(format!("unknown salary type code {code}")))
    }
}

/// Scheduling model of the work rule an employee is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkRuleType {
    Fixed,
    Flexible,
    Shift,
}

impl WorkRuleType {
    pub fn from_code(code: &RawCode) -> Option<Self> {
        if let Some(number) = code.as_number() {
            return match number {
                1 => Some(Self::Fixed),
                2 => Some(Self::Flexible),
                3 => Some(Self::Shift),
                _ => None,
            };
        }

        match code.as_name()?.as_str() {
            "fixed" => Some(Self::Fixed),
            "flexible" => Some(Self::Flexible),
            "shift" | "shifts" | "shift_based" => Some(Self::Shift),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Flexible => "flexible",
            Self::Shift => "shift-based",
        }
    }
}

impl<'de> Deserialize<'de> for WorkRuleType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = RawCode::deserialize(deserializer)?;
        Self::from_code(&code)
            .ok_or_else(|| de::Error::custom(format!("unknown work rule type code {code}")))
    }
}
