//! Core value types for sampled column data.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Runtime category of a sampled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free text.
    Text,
    /// Whole numbers.
    Integer,
    /// Fractional numbers, binary or exact.
    Decimal,
    /// Boolean values.
    Boolean,
    /// Dates, times and timestamps.
    Temporal,
    /// No values observed.
    Unknown,
}

impl ValueKind {
    /// Returns true if this kind is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Decimal)
    }
}

impl Default for ValueKind {
    fn default() -> Self {
        ValueKind::Unknown
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Decimal => "decimal",
            ValueKind::Boolean => "boolean",
            ValueKind::Temporal => "temporal",
            ValueKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A single non-null value drawn from a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SampleValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Exact decimal literal as delivered by the warehouse (e.g. `"12.50"`).
    Decimal(String),
    Boolean(bool),
    Temporal(NaiveDateTime),
}

impl SampleValue {
    /// The runtime category of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            SampleValue::Text(_) => ValueKind::Text,
            SampleValue::Integer(_) => ValueKind::Integer,
            SampleValue::Float(_) | SampleValue::Decimal(_) => ValueKind::Decimal,
            SampleValue::Boolean(_) => ValueKind::Boolean,
            SampleValue::Temporal(_) => ValueKind::Temporal,
        }
    }

    /// Coerce a numeric value to `f64`.
    ///
    /// Returns `None` for non-numeric values, unparseable decimal literals
    /// and non-finite floats.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            SampleValue::Integer(i) => *i as f64,
            SampleValue::Float(f) => *f,
            SampleValue::Decimal(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Text(s) | SampleValue::Decimal(s) => f.write_str(s),
            SampleValue::Integer(i) => write!(f, "{}", i),
            SampleValue::Float(v) => write!(f, "{}", v),
            SampleValue::Boolean(b) => write!(f, "{}", b),
            SampleValue::Temporal(ts) => write!(f, "{}", ts),
        }
    }
}

impl From<&str> for SampleValue {
    fn from(value: &str) -> Self {
        SampleValue::Text(value.to_string())
    }
}

impl From<String> for SampleValue {
    fn from(value: String) -> Self {
        SampleValue::Text(value)
    }
}

impl From<i64> for SampleValue {
    fn from(value: i64) -> Self {
        SampleValue::Integer(value)
    }
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        SampleValue::Float(value)
    }
}

impl From<bool> for SampleValue {
    fn from(value: bool) -> Self {
        SampleValue::Boolean(value)
    }
}

impl From<NaiveDateTime> for SampleValue {
    fn from(value: NaiveDateTime) -> Self {
        SampleValue::Temporal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_and_decimal_share_a_kind() {
        assert_eq!(SampleValue::Float(1.5).kind(), ValueKind::Decimal);
        assert_eq!(SampleValue::Decimal("1.50".into()).kind(), ValueKind::Decimal);
        assert!(ValueKind::Decimal.is_numeric());
        assert!(!ValueKind::Temporal.is_numeric());
    }

    #[test]
    fn test_as_f64_skips_bad_literals() {
        assert_eq!(SampleValue::Integer(7).as_f64(), Some(7.0));
        assert_eq!(SampleValue::Decimal(" 12.50 ".into()).as_f64(), Some(12.5));
        assert_eq!(SampleValue::Decimal("1,234.5".into()).as_f64(), None);
        assert_eq!(SampleValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(SampleValue::Text("12".into()).as_f64(), None);
    }

    #[test]
    fn test_display_matches_string_form() {
        assert_eq!(SampleValue::Decimal("12.50".into()).to_string(), "12.50");
        assert_eq!(SampleValue::Boolean(true).to_string(), "true");
        assert_eq!(SampleValue::Float(2.0).to_string(), "2");
    }
}
