// src/sheet/read.rs

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

use super::RawRow;
use crate::dates::CellValue;

/// Decode the first sheet of a workbook (or a CSV file) into header-keyed rows.
///
/// Blank cells are left out of a row and fully blank rows are skipped.
pub fn read_first_sheet(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = if ext == "csv" {
        read_csv(path)?
    } else {
        read_workbook(path)?
    };
    info!(path = %path.display(), rows = rows.len(), "read sheet");
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening workbook {:?}", path))?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("workbook {:?} has no sheets", path))?;
    debug!(sheet = %first, "reading first sheet");

    let range = workbook
        .worksheet_range(&first)
        .with_context(|| format!("reading sheet `{}` of {:?}", first, path))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .map(|cells| {
            headers
                .iter()
                .zip(cells.iter())
                .filter(|(h, _)| !h.is_empty())
                .filter_map(|(h, cell)| from_workbook_cell(cell).map(|v| (h.clone(), v)))
                .collect::<RawRow>()
        })
        .filter(|row| !row.is_empty())
        .collect())
}

/// Date cells keep their serial number, the same way a raw sheet-to-rows decode does.
fn from_workbook_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => Some(parse_iso_instant(s).map_or_else(
            || CellValue::Text(s.clone()),
            CellValue::DateTime,
        )),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        _ => None,
    }
}

fn parse_iso_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn read_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening csv {:?}", path))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading csv header of {:?}", path))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("parsing csv record in {:?}", path))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| !h.is_empty())
            .filter_map(|(h, raw)| from_csv_field(raw).map(|v| (h.clone(), v)))
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Plain numbers become numbers; everything else stays text.
fn from_csv_field(raw: &str) -> Option<CellValue> {
    if raw.trim().is_empty() {
        return None;
    }
    match raw.trim() {
        "TRUE" | "true" => return Some(CellValue::Bool(true)),
        "FALSE" | "false" => return Some(CellValue::Bool(false)),
        _ => {}
    }
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(raw.to_string())),
    }
}
