//! Row label catalogue of a payment document sheet.

use crate::error::ExtractionError;
use crate::sheet::Sheet;

/// Ordered index of first-column labels.
///
/// Lookups return the first matching row in row order, so documents with a
/// repeated label resolve deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowLabelIndex {
    entries: Vec<(usize, String)>,
}

impl RowLabelIndex {
    /// Index every row of the sheet by its trimmed first cell.
    pub fn build(sheet: &Sheet) -> Self {
        let entries = sheet
            .rows()
            .map(|(row, cells)| {
                let label = cells.first().map(|c| c.trim()).unwrap_or("");
                (row, label.to_string())
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label of a row, if the row exists.
    pub fn label(&self, row: usize) -> Option<&str> {
        self.entries
            .get(row)
            .filter(|(r, _)| *r == row)
            .map(|(_, label)| label.as_str())
    }

    /// First row whose label equals `label`.
    pub fn find(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(_, l)| l == label)
            .map(|(row, _)| *row)
    }

    /// Every row whose label equals `label`.
    pub fn occurrences(&self, label: &str) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|(_, l)| l == label)
            .map(|(row, _)| *row)
            .collect()
    }

    /// Like [`find`](Self::find), failing with [`ExtractionError::LabelNotFound`].
    pub fn require(&self, label: &str) -> Result<usize, ExtractionError> {
        self.find(label)
            .ok_or_else(|| ExtractionError::LabelNotFound(label.to_string()))
    }
}
