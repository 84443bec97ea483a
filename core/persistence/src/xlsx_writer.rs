//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{column_widths, PersistenceError, MAX_COLUMNS};
use engine::{column_union, CellValue, NotificationRecord};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::path::Path;

/// Header row for an export: `columns` first, then any other column found
/// in `rows`, in first-seen order.
pub fn export_headers<S: AsRef<str>>(columns: &[S], rows: &[NotificationRecord]) -> Vec<String> {
    let mut headers: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
    for column in column_union(rows) {
        if !headers.contains(&column) {
            headers.push(column);
        }
    }
    headers
}

pub fn export_xlsx<S: AsRef<str>>(
    rows: &[NotificationRecord],
    columns: &[S],
    sheet_name: &str,
    path: &Path,
) -> Result<(), PersistenceError> {
    let mut xlsx = build_workbook(rows, columns, sheet_name)?;
    xlsx.save(path)?;
    log::info!("[XLSX] exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn export_xlsx_to_buffer<S: AsRef<str>>(
    rows: &[NotificationRecord],
    columns: &[S],
    sheet_name: &str,
) -> Result<Vec<u8>, PersistenceError> {
    let mut xlsx = build_workbook(rows, columns, sheet_name)?;
    Ok(xlsx.save_to_buffer()?)
}

fn build_workbook<S: AsRef<str>>(
    rows: &[NotificationRecord],
    columns: &[S],
    sheet_name: &str,
) -> Result<XlsxWorkbook, PersistenceError> {
    let headers = export_headers(columns, rows);
    if headers.len() > MAX_COLUMNS {
        return Err(PersistenceError::InvalidFormat(format!(
            "{} columns exceeds the worksheet limit of {}",
            headers.len(),
            MAX_COLUMNS
        )));
    }

    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (index, record) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match record.get(header) {
                Some(CellValue::Number(n)) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Some(CellValue::Text(s)) if !s.is_empty() => {
                    worksheet.write_string(row, col, s)?;
                }
                _ => {}
            }
        }
    }

    for (col, width) in column_widths(&headers, rows).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, f64::from(width))?;
    }

    Ok(xlsx)
}
