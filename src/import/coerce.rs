//! Lenient number reading for imported cells. Bad numbers become `None`, never errors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates::CellValue;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?").expect("float prefix regex")
});
static INT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+").expect("int prefix regex"));

/// Leading decimal number of a cell (`"12kg"` → 12).
pub fn parse_float(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => FLOAT_PREFIX
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Leading whole number of a cell; fractional numbers are truncated.
pub fn parse_int(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        CellValue::Text(s) => INT_PREFIX
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<i64>().ok()),
        _ => None,
    }
}

pub fn float_or_zero(cell: Option<&CellValue>) -> f64 {
    cell.and_then(parse_float).unwrap_or(0.0)
}

pub fn int_or_zero(cell: Option<&CellValue>) -> i64 {
    cell.and_then(parse_int).unwrap_or(0)
}

/// Text of a non-blank cell, otherwise `default`.
pub fn text_or(cell: Option<&CellValue>, default: &str) -> String {
    match cell {
        Some(c) if c.is_truthy() => c.to_string(),
        _ => default.to_string(),
    }
}
