//! Workbook reading using calamine.
//!
//! calamine decodes legacy `.xls` strings through the workbook code page
//! (Windows-1251 for the payment documents), so every cell comes out as UTF-8.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::{debug, trace};

use super::Sheet;
use crate::error::{ExtractionError, Result};

/// Open a payment document and return its first sheet.
pub fn open_document(path: &Path) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ExtractionError::EmptyWorkbook)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ExtractionError::EmptyWorkbook)??;

    let sheet = range_to_sheet(&name, &range);
    debug!(
        "Loaded sheet '{}' with {} rows from {}",
        sheet.name(),
        sheet.row_count(),
        path.display()
    );
    Ok(sheet)
}

/// Open every sheet of a workbook whose name passes `filter`.
pub fn open_sheets<F>(path: &Path, filter: F) -> Result<Vec<Sheet>>
where
    F: Fn(&str) -> bool,
{
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        if !filter(&name) {
            trace!("Skipping sheet '{}'", name);
            continue;
        }
        let range = workbook.worksheet_range(&name)?;
        sheets.push(range_to_sheet(&name, &range));
    }

    Ok(sheets)
}

/// Convert a calamine range into a sheet with absolute cell positions.
///
/// Ranges start at the first used cell, so the offset is added back.
pub fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for data_row in range.rows() {
        let mut row = vec![String::new(); col_offset];
        row.extend(data_row.iter().map(cell_text));
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
        rows.push(row);
    }

    Sheet::new(name, rows)
}

/// Text of a cell as a spreadsheet user would read it.
pub fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn format_float(value: f64) -> String {
    // Integral numbers are printed without a fraction so identifiers and flat
    // numbers stored as numbers read back as typed.
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("кв. 5".to_string())), "кв. 5");
        assert_eq!(cell_text(&Data::Float(57.0)), "57");
        assert_eq!(cell_text(&Data::Float(44.25)), "44.25");
        assert_eq!(cell_text(&Data::Int(630049)), "630049");
    }

    #[test]
    fn test_range_offset_is_preserved() {
        let mut range = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Итого".to_string()));
        range.set_value((3, 2), Data::Float(10.5));

        let sheet = range_to_sheet("doc", &range);
        assert_eq!(sheet.cell(2, 1), "Итого");
        assert_eq!(sheet.cell(3, 2), "10.5");
        assert_eq!(sheet.cell(0, 0), "");
        assert_eq!(sheet.row_count(), 4);
    }

    #[test]
    fn test_open_document_from_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xlsx");

        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut("A1").set_value_string("Услуга");
        sheet.get_cell_mut("C2").set_value_number(12.5);
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let sheet = open_document(&path).unwrap();
        assert_eq!(sheet.cell(0, 0), "Услуга");
        assert_eq!(sheet.cell(1, 2), "12.5");
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(open_document(Path::new("/nonexistent/doc.xls")).is_err());
    }
}
