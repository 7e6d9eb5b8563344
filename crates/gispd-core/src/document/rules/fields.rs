//! Header field locations.

use tracing::debug;

use super::anchors::Anchor;
use super::layout::*;
use super::{FieldExtractor, FieldMatch};
use crate::error::ExtractionError;
use crate::sheet::Sheet;

/// Where a header field is printed and how its value is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocation {
    /// Field name used in diagnostics.
    pub field: &'static str,
    /// 0-based row of the expected cell.
    pub row: usize,
    /// 0-based column of the expected cell.
    pub col: usize,
    pub anchor: Anchor,
}

pub const PERIOD: FieldLocation = FieldLocation {
    field: "period",
    row: 0,
    col: 0,
    anchor: Anchor::PrefixSuffix {
        prefix: PERIOD_PREFIX,
        suffix: PERIOD_SUFFIX,
    },
};

pub const ACCOUNT: FieldLocation = FieldLocation {
    field: "account",
    row: 7,
    col: 6,
    anchor: Anchor::PrefixSuffix {
        prefix: ACCOUNT_PREFIX,
        suffix: "",
    },
};

pub const ROOM: FieldLocation = FieldLocation {
    field: "room",
    row: 8,
    col: 0,
    anchor: Anchor::Between {
        before: ROOM_MARKER,
        after: "",
    },
};

pub const AREA: FieldLocation = FieldLocation {
    field: "area",
    row: 9,
    col: 0,
    anchor: Anchor::Between {
        before: AREA_BEFORE,
        after: AREA_AFTER,
    },
};

pub const BANK_ACCOUNT: FieldLocation = FieldLocation {
    field: "bank account",
    row: 12,
    col: 0,
    anchor: Anchor::Between {
        before: BANK_ACCOUNT_BEFORE,
        after: BANK_ACCOUNT_AFTER,
    },
};

pub const BIK: FieldLocation = FieldLocation {
    field: "bik",
    row: 12,
    col: 0,
    anchor: Anchor::Between {
        before: BIK_BEFORE,
        after: "",
    },
};

pub const HEADER_FIELDS: [FieldLocation; 6] = [PERIOD, ACCOUNT, ROOM, AREA, BANK_ACCOUNT, BIK];

fn extract_at(sheet: &Sheet, location: &FieldLocation, row: usize, col: usize) -> Option<FieldMatch<String>> {
    let text = sheet.cell(row, col);
    location
        .anchor
        .extract(text)
        .filter(|value| !value.is_empty())
        .map(|value| FieldMatch::new(value, text).with_position(row, col))
}

/// Extract a field from its expected cell only.
pub fn locate(sheet: &Sheet, location: &FieldLocation) -> Option<FieldMatch<String>> {
    extract_at(sheet, location, location.row, location.col)
}

/// Extract a field from its expected cell, falling back to the first matching
/// cell in row-major order.
pub fn locate_with_fallback(
    sheet: &Sheet,
    location: &FieldLocation,
) -> Result<FieldMatch<String>, ExtractionError> {
    if let Some(found) = locate(sheet, location) {
        return Ok(found);
    }

    let fallback = sheet
        .cells()
        .find_map(|(row, col, _)| extract_at(sheet, location, row, col));

    match fallback {
        Some(found) => {
            debug!(
                "Field '{}' not at ({}, {}), found at {:?} in '{}'",
                location.field, location.row, location.col, found.position, found.source
            );
            Ok(found)
        }
        None => Err(ExtractionError::MissingAnchor {
            field: location.field.to_string(),
            text: sheet.cell(location.row, location.col).to_string(),
        }),
    }
}
