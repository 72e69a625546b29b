// src/sheet/write.rs

use anyhow::{Context, Result};
use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;
use std::{fs, path::Path};
use tracing::{info, warn};

use super::Table;
use crate::dates::CellValue;

const MAX_SHEET_NAME: usize = 31;

/// Write tables to `path`: one worksheet each for `.xlsx`, or the first table for `.csv`.
pub fn write_tables(path: &Path, tables: &[Table]) -> Result<()> {
    anyhow::ensure!(!tables.is_empty(), "nothing to write to {:?}", path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        if tables.len() > 1 {
            warn!(path = %path.display(), dropped = tables.len() - 1, "csv holds one sheet; extra sheets skipped");
        }
        write_csv(path, &tables[0])?;
    } else {
        write_xlsx(path, tables)?;
    }

    let rows: usize = tables.iter().map(|t| t.rows.len()).sum();
    info!(path = %path.display(), sheets = tables.len(), rows, "wrote workbook");
    Ok(())
}

fn write_xlsx(path: &Path, tables: &[Table]) -> Result<()> {
    let mut workbook = Workbook::new();

    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(sheet_name(&table.name))
            .with_context(|| format!("naming sheet `{}`", table.name))?;

        for (col, header) in table.headers.iter().enumerate() {
            sheet.write_string(0, col as u16, header)?;
        }

        for (r, row) in table.rows.iter().enumerate() {
            let r = (r + 1) as u32;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Number(n) => {
                        sheet.write_number(r, c, *n)?;
                    }
                    CellValue::Bool(b) => {
                        sheet.write_boolean(r, c, *b)?;
                    }
                    other => {
                        sheet.write_string(r, c, other.to_string())?;
                    }
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {:?}", path))?;
    Ok(())
}

fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating csv {:?}", path))?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        let mut record: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        record.resize(table.headers.len(), String::new());
        wtr.write_record(&record)?;
    }
    wtr.flush().with_context(|| format!("flushing csv {:?}", path))?;
    Ok(())
}

/// Worksheet names are limited to 31 characters and may not contain `[]:*?/\`.
fn sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}
