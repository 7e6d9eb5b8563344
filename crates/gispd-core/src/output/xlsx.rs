//! Output workbook backed by umya-spreadsheet.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Worksheet};

use super::{OutputSink, DOCUMENT_NUMBER_COLUMN, OUTPUT_SHEETS, PENALTIES_SHEET, ROOMS_SHEET, SERVICES_SHEET};
use crate::error::OutputError;
use crate::models::rows::{CellValue, DocumentExport};

const AMOUNT_FORMAT: &str = "0.00";
const GROUPED_AMOUNT_FORMAT: &str = "#,##0.00";

/// Destination workbook on disk.
///
/// Rows are appended after the last used row of each sheet, so an existing
/// template keeps its header rows.
pub struct XlsxOutput {
    path: PathBuf,
    book: Spreadsheet,
    documents: HashSet<String>,
}

impl XlsxOutput {
    /// Open the destination, creating an empty workbook with the three sheets
    /// when the file does not exist.
    pub fn open_or_create(path: &Path) -> Result<Self, OutputError> {
        if !path.exists() {
            info!("Creating output workbook {}", path.display());
            let mut book = umya_spreadsheet::new_file_empty_worksheet();
            for title in OUTPUT_SHEETS {
                book.new_sheet(title)
                    .map_err(|e| OutputError::Sheet(format!("{}: {}", title, e)))?;
            }
            umya_spreadsheet::writer::xlsx::write(&book, path)
                .map_err(|e| OutputError::Write(e.to_string()))?;
        }

        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| OutputError::Read(e.to_string()))?;

        for title in OUTPUT_SHEETS {
            if book.get_sheet_by_name(title).is_none() {
                return Err(OutputError::SchemaMismatch {
                    sheet: title.to_string(),
                });
            }
        }

        let documents = book
            .get_sheet_by_name(ROOMS_SHEET)
            .map(existing_documents)
            .unwrap_or_default();
        debug!(
            "Output {} holds {} document(s)",
            path.display(),
            documents.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            book,
            documents,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of documents present in the rooms sheet.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    fn append_rows(&mut self, title: &str, rows: &[Vec<CellValue>]) -> Result<(), OutputError> {
        let sheet = self
            .book
            .get_sheet_by_name_mut(title)
            .ok_or_else(|| OutputError::SchemaMismatch {
                sheet: title.to_string(),
            })?;

        let mut row = sheet.get_highest_row() + 1;
        for cells in rows {
            write_row(sheet, row, cells);
            row += 1;
        }
        Ok(())
    }
}

impl OutputSink for XlsxOutput {
    fn append(&mut self, export: &DocumentExport) -> Result<(), OutputError> {
        let services: Vec<_> = export.services.iter().map(|s| s.cells()).collect();
        let penalties: Vec<_> = export.penalties.iter().map(|p| p.cells()).collect();

        self.append_rows(ROOMS_SHEET, &[export.room.cells()])?;
        self.append_rows(SERVICES_SHEET, &services)?;
        self.append_rows(PENALTIES_SHEET, &penalties)?;

        self.documents.insert(export.document_number().to_string());
        Ok(())
    }

    fn contains(&self, document_number: &str) -> bool {
        self.documents.contains(document_number)
    }

    fn save(&mut self) -> Result<(), OutputError> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path)
            .map_err(|e| OutputError::Write(e.to_string()))?;
        debug!("Saved {}", self.path.display());
        Ok(())
    }
}

fn existing_documents(sheet: &Worksheet) -> HashSet<String> {
    let col = DOCUMENT_NUMBER_COLUMN as u32 + 1;
    (1..=sheet.get_highest_row())
        .filter_map(|row| sheet.get_cell((col, row)))
        .map(|cell| cell.get_value().trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Write one row; `row` is 1-based as in the workbook.
fn write_row(sheet: &mut Worksheet, row: u32, cells: &[CellValue]) {
    for (index, value) in cells.iter().enumerate() {
        let col = index as u32 + 1;
        match value {
            CellValue::Empty => {}
            CellValue::Text(text) => {
                sheet.get_cell_mut((col, row)).set_value_string(text.as_str());
            }
            CellValue::Integer(n) => {
                sheet.get_cell_mut((col, row)).set_value_number(*n as f64);
            }
            CellValue::Amount(amount) => write_number(sheet, col, row, *amount, AMOUNT_FORMAT),
            CellValue::GroupedAmount(amount) => {
                write_number(sheet, col, row, *amount, GROUPED_AMOUNT_FORMAT)
            }
        }
    }
}

fn write_number(sheet: &mut Worksheet, col: u32, row: u32, value: Decimal, format: &str) {
    sheet
        .get_cell_mut((col, row))
        .set_value_number(
            value
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .to_f64()
                .unwrap_or_default(),
        );
    sheet
        .get_style_mut((col, row))
        .get_number_format_mut()
        .set_format_code(format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{CapitalRepair, DocumentHeader, Period, RoomKey};
    use crate::models::rows::{PenaltyRow, RoomRow, ServiceDetail, ServiceRow, MAINTENANCE_SERVICE};
    use calamine::{open_workbook_auto, Reader};
    use pretty_assertions::assert_eq;

    fn export(account: &str) -> DocumentExport {
        let period = Period::new(1, 2024).unwrap();
        let header = DocumentHeader {
            period,
            account: account.to_string(),
            document_number: period.document_number(account),
            room: RoomKey::residential(57),
            area: Decimal::new(445, 1),
            bank_account: "40702810000000000001".to_string(),
            bik: "045004641".to_string(),
            unique_id: Some("ID-57".to_string()),
            gis_account: Some("00АА000001".to_string()),
            capital_repair: CapitalRepair {
                rate: Decimal::new(95, 1),
                charged: Decimal::new(42275, 2),
                recalculation: None,
                total: Decimal::new(42275, 2),
            },
            total: Decimal::new(100, 0),
        };
        let room = RoomRow::from_header(&header, 31);
        let number = header.document_number.clone();
        DocumentExport {
            header,
            room,
            services: vec![ServiceRow {
                document_number: number.clone(),
                service: MAINTENANCE_SERVICE.to_string(),
                detail: ServiceDetail::Maintenance {
                    tariff: Decimal::new(275, 1),
                    total: Decimal::new(11513, 1),
                },
            }],
            penalties: vec![PenaltyRow {
                document_number: number,
                amount: Decimal::new(12345, 3),
            }],
            warnings: Vec::new(),
        }
    }

    fn sheet_rows(path: &Path, title: &str) -> Vec<Vec<String>> {
        let mut workbook = open_workbook_auto(path).unwrap();
        let range = workbook.worksheet_range(title).unwrap();
        crate::sheet::range_to_sheet(title, &range)
            .rows()
            .map(|(_, row)| row.to_vec())
            .collect()
    }

    #[test]
    fn test_create_append_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PDTemplate.xlsx");

        let mut output = XlsxOutput::open_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(output.document_count(), 0);

        output.append(&export("123456")).unwrap();
        output.save().unwrap();

        let rooms = sheet_rows(&path, ROOMS_SHEET);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0][0], "00АА000001");
        assert_eq!(rooms[0][2], "2401123456");
        assert_eq!(rooms[0][3], "01.2024");
        assert_eq!(rooms[0][12], "40702810000000000001");

        let penalties = sheet_rows(&path, PENALTIES_SHEET);
        assert_eq!(penalties[0][1], "Пени");
        assert_eq!(penalties[0][3], "12.35");

        let reopened = XlsxOutput::open_or_create(&path).unwrap();
        assert!(reopened.contains("2401123456"));
        assert!(!reopened.contains("2401654321"));
    }

    #[test]
    fn test_rows_are_appended_after_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PDTemplate.xlsx");

        let mut output = XlsxOutput::open_or_create(&path).unwrap();
        output.append(&export("123456")).unwrap();
        output.save().unwrap();

        let mut output = XlsxOutput::open_or_create(&path).unwrap();
        output.append(&export("654321")).unwrap();
        output.save().unwrap();

        let rooms = sheet_rows(&path, ROOMS_SHEET);
        let numbers: Vec<&str> = rooms.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(numbers, vec!["2401123456", "2401654321"]);
        assert_eq!(sheet_rows(&path, SERVICES_SHEET).len(), 2);
    }

    #[test]
    fn test_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.xlsx");
        let book = umya_spreadsheet::new_file();
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        match XlsxOutput::open_or_create(&path) {
            Err(OutputError::SchemaMismatch { sheet }) => assert_eq!(sheet, ROOMS_SHEET),
            other => panic!("expected schema mismatch, got {:?}", other.map(|o| o.document_count())),
        }
    }
}
