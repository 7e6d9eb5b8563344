//! Output tables for the GIS ZHKH import template.
//!
//! A document is appended as one unit: its room row, service rows and penalty
//! rows, all keyed by the same document number.

mod xlsx;

pub use xlsx::XlsxOutput;

use crate::error::OutputError;
use crate::models::rows::{CellValue, DocumentExport};

/// Sheet receiving one row per document.
pub const ROOMS_SHEET: &str = "Разделы 1-2";
/// Sheet receiving service rows.
pub const SERVICES_SHEET: &str = "Разделы 3-6";
/// Sheet receiving penalty rows.
pub const PENALTIES_SHEET: &str = "Неустойки";

/// Sheets every destination workbook must carry.
pub const OUTPUT_SHEETS: [&str; 3] = [ROOMS_SHEET, SERVICES_SHEET, PENALTIES_SHEET];

/// 0-based column of the document number in the rooms sheet.
pub const DOCUMENT_NUMBER_COLUMN: usize = 2;

/// Destination for exported documents.
pub trait OutputSink {
    /// Append every row of a document.
    fn append(&mut self, export: &DocumentExport) -> Result<(), OutputError>;

    /// Whether a document with this number was already written.
    fn contains(&self, document_number: &str) -> bool;

    /// Persist appended rows.
    fn save(&mut self) -> Result<(), OutputError>;
}

/// In-memory sink, used for previews and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryOutput {
    pub rooms: Vec<Vec<CellValue>>,
    pub services: Vec<Vec<CellValue>>,
    pub penalties: Vec<Vec<CellValue>>,
    pub saves: usize,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for MemoryOutput {
    fn append(&mut self, export: &DocumentExport) -> Result<(), OutputError> {
        self.rooms.push(export.room.cells());
        self.services
            .extend(export.services.iter().map(|s| s.cells()));
        self.penalties
            .extend(export.penalties.iter().map(|p| p.cells()));
        Ok(())
    }

    fn contains(&self, document_number: &str) -> bool {
        self.rooms.iter().any(|row| {
            row.get(DOCUMENT_NUMBER_COLUMN)
                .is_some_and(|cell| cell.render() == document_number)
        })
    }

    fn save(&mut self) -> Result<(), OutputError> {
        self.saves += 1;
        Ok(())
    }
}
