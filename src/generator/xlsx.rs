//! XLSX workbook rendering.

use super::{header_rows, unique_name};
use crate::error::Result;
use crate::report::{Cell, ReportHeader, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::collections::HashSet;

/// Rows kept free above the metadata block for the branding mark.
const BRANDING_ROWS: u32 = 7;

/// Excel's worksheet name limit.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Render tables into one workbook, one worksheet per table, and return the file bytes.
pub fn workbook_bytes(tables: &[&Table], header: &ReportHeader) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let mut used_names: HashSet<String> = HashSet::new();

    for table in tables {
        let name = unique_sheet_name(&table.name, &mut used_names);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_sheet(worksheet, table, header, &bold)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Metadata block from row 8, then a blank row, then the table.
fn write_sheet(
    worksheet: &mut Worksheet,
    table: &Table,
    header: &ReportHeader,
    bold: &Format,
) -> std::result::Result<(), XlsxError> {
    let mut row = BRANDING_ROWS;

    for (label, value) in header_rows(header) {
        worksheet.write_string_with_format(row, 0, label, bold)?;
        worksheet.write_string(row, 1, value)?;
        row += 1;
    }

    row += 1;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, name, bold)?;
    }
    row += 1;

    for cells in &table.rows {
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Cell::Integer(n) => {
                    worksheet.write_number(row, col, *n as f64)?;
                }
                Cell::Empty => {}
            }
        }
        row += 1;
    }

    Ok(())
}

/// Make a string a valid worksheet name: no `[]:*?/\`, no leading or trailing
/// apostrophe, at most 31 characters, never empty.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME_LEN).collect();

    if truncated.is_empty() {
        "Sheet".to_string()
    } else {
        truncated
    }
}

/// Sanitized name not yet used in this workbook (compared case-insensitively).
fn unique_sheet_name(name: &str, used: &mut HashSet<String>) -> String {
    unique_name(&sanitize_sheet_name(name), MAX_SHEET_NAME_LEN, used)
}
