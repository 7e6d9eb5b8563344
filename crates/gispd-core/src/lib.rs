//! Core library for exporting utility payment documents to GIS ZHKH.
//!
//! This crate provides:
//! - Reference lookups (premises to unique identifier to GIS ZHKH account)
//! - Anchor-based header extraction from payment document sheets
//! - Service classification into the GIS ZHKH vocabulary
//! - Room, service and penalty rows for the import template workbook

pub mod document;
pub mod error;
pub mod lookup;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sheet;

pub use document::{DocumentParser, DocumentTransformer};
pub use error::{ExtractionError, GispdError, OutputError, Result};
pub use lookup::ReferenceData;
pub use models::config::GispdConfig;
pub use models::document::{DocumentHeader, Period, RoomKey, RoomKind, ServiceClassification};
pub use models::rows::{CellValue, DocumentExport, PenaltyRow, RoomRow, ServiceRow};
pub use output::{MemoryOutput, OutputSink, XlsxOutput};
pub use pipeline::{DocumentOutcome, Pipeline};
pub use sheet::Sheet;
