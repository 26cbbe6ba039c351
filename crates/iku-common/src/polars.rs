//! Polars AnyValue utility functions.
//!
//! Spreadsheet columns are loaded as nullable strings while aggregated frames
//! carry integer counts. These helpers pull either shape back out of a
//! `DataFrame` without caring which physical dtype Polars picked.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, properly formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use iku_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(2019.0)), "2019");
/// assert_eq!(any_to_string(AnyValue::String("Kimia")), "Kimia");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => crate::format::format_numeric(f64::from(v)),
        AnyValue::Float64(v) => crate::format::format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts `AnyValue` to a trimmed `String`, returning `None` if the result is empty.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Converts an `AnyValue` to `i64`, returning `None` for non-integer or null values.
///
/// Floating-point values are truncated.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => Some(v as i64),
        AnyValue::Float64(v) => Some(v as i64),
        AnyValue::String(s) => parse_f64(s).map(|v| v as i64),
        AnyValue::StringOwned(s) => parse_f64(&s).map(|v| v as i64),
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
///
/// A decimal comma is accepted (`"12,5"`), as exported by Indonesian locales.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse::<f64>().ok())
}

/// Reads a column as trimmed, non-empty strings (`None` for blanks and nulls).
pub fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    Ok(column
        .as_materialized_series()
        .iter()
        .map(any_to_string_non_empty)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(20191.0)), "20191");
    }

    #[test]
    fn test_any_to_string_non_empty() {
        assert_eq!(any_to_string_non_empty(AnyValue::Null), None);
        assert_eq!(any_to_string_non_empty(AnyValue::String("  ")), None);
        assert_eq!(
            any_to_string_non_empty(AnyValue::String(" Kimia ")),
            Some("Kimia".to_string())
        );
    }

    #[test]
    fn test_any_to_i64() {
        assert_eq!(any_to_i64(AnyValue::Null), None);
        assert_eq!(any_to_i64(AnyValue::UInt32(7)), Some(7));
        assert_eq!(any_to_i64(AnyValue::Float64(3.9)), Some(3));
        assert_eq!(any_to_i64(AnyValue::String("12")), Some(12));
    }

    #[test]
    fn test_parse_f64_decimal_comma() {
        assert_eq!(parse_f64("12,5"), Some(12.5));
        assert_eq!(parse_f64(" 20 "), Some(20.0));
        assert_eq!(parse_f64(""), None);
    }

    #[test]
    fn test_column_strings() {
        let df = DataFrame::new(vec![
            Series::new("Nama".into(), [Some("Ani"), None, Some("  ")]).into_column(),
        ])
        .unwrap();
        let values = column_strings(&df, "Nama").unwrap();
        assert_eq!(values, vec![Some("Ani".to_string()), None, None]);
        assert!(column_strings(&df, "NIM").is_err());
    }
}
