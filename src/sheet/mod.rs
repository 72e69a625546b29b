//! Spreadsheet boundary: rows in, workbooks out.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::dates::CellValue;

pub mod export;
pub mod read;
pub mod write;

pub use read::read_first_sheet;
pub use write::write_tables;

/// One decoded sheet row, keyed by column header.
pub type RawRow = BTreeMap<String, CellValue>;

/// A sheet to be written: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new<S: Into<String>>(name: impl Into<String>, headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// One column per distinct field in encounter order, one row per record.
    pub fn from_records<T: Serialize>(name: impl Into<String>, records: &[T]) -> Result<Self> {
        let objects = records
            .iter()
            .map(|r| match serde_json::to_value(r)? {
                Value::Object(map) => Ok(map),
                other => {
                    let mut map = serde_json::Map::new();
                    map.insert("value".to_string(), other);
                    Ok(map)
                }
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()
            .context("serializing records for export")?;

        let mut headers: Vec<String> = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let mut table = Table::new(name, headers.clone());
        for obj in &objects {
            table.push_row(
                headers
                    .iter()
                    .map(|h| obj.get(h).map(cell_from_json).unwrap_or(CellValue::Empty))
                    .collect(),
            );
        }
        Ok(table)
    }
}

fn cell_from_json(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
        Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}
