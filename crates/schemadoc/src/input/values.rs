//! Typing raw text cells.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::SampleValue;

use super::table::DataTable;

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), // ISO date
        Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap(), // US date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(), // Alt ISO
    ]
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// The type a single cell looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Boolean,
    Integer,
    Decimal,
    Date,
    Timestamp,
    Text,
}

fn detect(trimmed: &str) -> (CellType, Option<SampleValue>) {
    match trimmed.to_lowercase().as_str() {
        "true" | "yes" => return (CellType::Boolean, Some(SampleValue::Boolean(true))),
        "false" | "no" => return (CellType::Boolean, Some(SampleValue::Boolean(false))),
        _ => {}
    }

    if let Ok(n) = trimmed.parse::<i64>() {
        return (CellType::Integer, Some(SampleValue::Integer(n)));
    }

    if trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
        return (CellType::Decimal, Some(SampleValue::Decimal(trimmed.to_string())));
    }

    if DATE_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        for format in DATETIME_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
                return (CellType::Timestamp, Some(SampleValue::Temporal(ts)));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                let midnight = date.and_hms_opt(0, 0, 0);
                return (CellType::Date, midnight.map(SampleValue::Temporal));
            }
        }
    }

    (CellType::Text, None)
}

/// Convert a raw cell to a typed sample value. Null-like cells yield `None`.
pub fn parse_cell(raw: &str) -> Option<SampleValue> {
    if DataTable::is_null_value(raw) {
        return None;
    }
    let trimmed = raw.trim();
    match detect(trimmed) {
        (_, Some(value)) => Some(value),
        (_, None) => Some(SampleValue::Text(trimmed.to_string())),
    }
}

/// Warehouse-style type name for a column of raw cells.
///
/// A column gets a specific type only when every non-null cell agrees;
/// integers mixed with decimals widen to `FLOAT`, dates mixed with
/// timestamps widen to `TIMESTAMP_NTZ`. Anything else is `VARCHAR`.
pub fn infer_declared_type<'a>(cells: impl IntoIterator<Item = &'a str>) -> &'static str {
    let mut seen: Option<CellType> = None;

    for cell in cells {
        if DataTable::is_null_value(cell) {
            continue;
        }
        let current = detect(cell.trim()).0;
        seen = Some(match (seen, current) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(CellType::Integer), CellType::Decimal) | (Some(CellType::Decimal), CellType::Integer) => {
                CellType::Decimal
            }
            (Some(CellType::Date), CellType::Timestamp) | (Some(CellType::Timestamp), CellType::Date) => {
                CellType::Timestamp
            }
            _ => return "VARCHAR",
        });
    }

    match seen {
        Some(CellType::Integer) => "NUMBER(38,0)",
        Some(CellType::Decimal) => "FLOAT",
        Some(CellType::Boolean) => "BOOLEAN",
        Some(CellType::Date) => "DATE",
        Some(CellType::Timestamp) => "TIMESTAMP_NTZ",
        Some(CellType::Text) | None => "VARCHAR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_types() {
        assert_eq!(parse_cell(" 42 "), Some(SampleValue::Integer(42)));
        assert_eq!(parse_cell("12.50"), Some(SampleValue::Decimal("12.50".into())));
        assert_eq!(parse_cell("Yes"), Some(SampleValue::Boolean(true)));
        assert_eq!(parse_cell("NA"), None);
        assert_eq!(parse_cell("NaN"), Some(SampleValue::Text("NaN".into())));
        assert_eq!(parse_cell("Berlin"), Some(SampleValue::Text("Berlin".into())));
    }

    #[test]
    fn test_parse_cell_dates() {
        let date = parse_cell("2024-03-01").unwrap();
        assert_eq!(date.to_string(), "2024-03-01 00:00:00");

        let ts = parse_cell("2024-03-01T12:30:00").unwrap();
        assert!(matches!(ts, SampleValue::Temporal(_)));

        assert!(matches!(parse_cell("2024-13-45"), Some(SampleValue::Text(_))));
    }

    #[test]
    fn test_infer_declared_type() {
        assert_eq!(infer_declared_type(["1", "2", ""]), "NUMBER(38,0)");
        assert_eq!(infer_declared_type(["1", "2.5"]), "FLOAT");
        assert_eq!(infer_declared_type(["true", "no"]), "BOOLEAN");
        assert_eq!(infer_declared_type(["2024-01-01", "2024-02-01"]), "DATE");
        assert_eq!(infer_declared_type(["2024-01-01", "2024-02-01 10:00:00"]), "TIMESTAMP_NTZ");
        assert_eq!(infer_declared_type(["1", "x"]), "VARCHAR");
        assert_eq!(infer_declared_type(["NA", "null"]), "VARCHAR");
    }
}
