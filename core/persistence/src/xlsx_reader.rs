//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::{ImportedTable, PersistenceError};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use engine::{CellValue, NotificationRecord};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

pub fn import_xlsx(path: &Path) -> Result<ImportedTable, PersistenceError> {
    let workbook: Xlsx<_> = open_workbook(path)?;
    let table = read_first_sheet(workbook)?;
    log::info!("[XLSX] imported {} rows from {}", table.rows.len(), path.display());
    Ok(table)
}

pub fn import_xlsx_from_buffer(bytes: &[u8]) -> Result<ImportedTable, PersistenceError> {
    let workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    read_first_sheet(workbook)
}

fn read_first_sheet<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<ImportedTable, PersistenceError> {
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PersistenceError::InvalidFormat("Workbook contains no sheets".to_string()))?;

    let range = workbook.worksheet_range(&first_sheet)?;
    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| PersistenceError::InvalidFormat(format!("Sheet '{}' has no header row", first_sheet)))?;
    let columns = header_names(header_row);

    let mut records = Vec::new();
    for row in rows {
        let mut record = NotificationRecord::new();
        for (column, cell) in columns.iter().zip(row.iter()) {
            if let Some(value) = convert_cell(cell) {
                record.set(column.as_str(), value);
            }
        }
        // Blank rows are skipped
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(ImportedTable {
        columns,
        rows: records,
    })
}

/// Header text per column. Blank headers become `__EMPTY`, `__EMPTY_1`, ...
/// and repeated names get a `_N` suffix so every column key is unique.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(row.len());
    let mut blanks = 0;
    for cell in row {
        let text = convert_cell(cell).map(|v| v.display_value()).unwrap_or_default();
        let base = if text.trim().is_empty() {
            let name = if blanks == 0 {
                "__EMPTY".to_string()
            } else {
                format!("__EMPTY_{}", blanks)
            };
            blanks += 1;
            name
        } else {
            text
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }
    names
}

fn convert_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Text(b.to_string())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
        Data::DateTime(dt) => Some(serial_to_date_text(dt.as_f64())),
        Data::DateTimeIso(s) => Some(CellValue::Text(s.clone())),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
    }
}

/// Workbook date serial (days since 1899-12-30) as `YYYY-MM-DD` text.
fn serial_to_date_text(serial: f64) -> CellValue {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial.floor() as i64)))
        .map(|date| CellValue::Text(date.format("%Y-%m-%d").to_string()))
        .unwrap_or(CellValue::Number(serial))
}
