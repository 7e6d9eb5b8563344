//! Payment document extraction.

pub mod rules;
mod transformer;

pub use transformer::{DocumentParser, DocumentTransformer};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
