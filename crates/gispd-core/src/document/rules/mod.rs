//! Rule-based field extractors for payment documents.

pub mod amounts;
pub mod anchors;
pub mod fields;
pub mod labels;
pub mod layout;
pub mod period;
pub mod services;

pub use amounts::{parse_amount, read_amount, AmountCell};
pub use anchors::{remove_prefix_suffix, substring_between, Anchor};
pub use fields::{locate, locate_with_fallback, FieldLocation, HEADER_FIELDS};
pub use labels::RowLabelIndex;
pub use layout::*;
pub use period::{month_from_name, parse_period};
pub use services::{simple_name, ServiceClassifier};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// Extracted value together with the cell it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Cell text that was matched.
    pub source: String,
    /// 0-based (row, column) of the source cell.
    pub position: Option<(usize, usize)>,
}

impl<T> FieldMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, row: usize, col: usize) -> Self {
        self.position = Some((row, col));
        self
    }
}
