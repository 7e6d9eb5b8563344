//! Error types for the gispd-core library.

use thiserror::Error;

/// Main error type for the gispd library.
#[derive(Error, Debug)]
pub enum GispdError {
    /// Source or reference workbook could not be opened or read.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Output workbook error.
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Payment document extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while extracting a single payment document.
///
/// Every variant is local to the document being processed; callers are
/// expected to report it and move on to the next document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// An anchored header field did not match any cell.
    #[error("{field} not found in '{text}'")]
    MissingAnchor { field: String, text: String },

    /// A labeled row is absent from the document.
    #[error("row labeled '{0}' not found")]
    LabelNotFound(String),

    /// Period month name is not in the month table.
    #[error("unknown month name '{0}'")]
    UnknownMonth(String),

    /// Line item description is not in the service vocabulary.
    #[error("room {room}: unknown service '{service}'")]
    UnknownService { room: u32, service: String },

    /// Failed to parse a value.
    #[error("failed to parse {field}: '{value}'")]
    Parse { field: String, value: String },

    /// The workbook has no sheets.
    #[error("workbook has no sheets")]
    EmptyWorkbook,
}

/// Errors related to the output workbook.
#[derive(Error, Debug)]
pub enum OutputError {
    /// The destination exists but lacks one of the required sheets.
    #[error("output workbook is missing sheet '{sheet}'")]
    SchemaMismatch { sheet: String },

    /// Failed to read the existing destination.
    #[error("failed to read output workbook: {0}")]
    Read(String),

    /// Failed to save the destination.
    #[error("failed to write output workbook: {0}")]
    Write(String),

    /// Failed to create a sheet.
    #[error("failed to create sheet: {0}")]
    Sheet(String),
}

/// Result type for the gispd library.
pub type Result<T> = std::result::Result<T, GispdError>;
