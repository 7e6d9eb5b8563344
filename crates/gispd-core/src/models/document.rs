//! Payment document data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of premises a payment document is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Residential flat (квартира).
    Residential,
    /// Office (офис).
    Office,
}

/// Key identifying premises in the reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomKey {
    /// Flat or office number.
    pub number: u32,
    /// Kind of premises.
    pub kind: RoomKind,
}

impl RoomKey {
    pub fn residential(number: u32) -> Self {
        Self {
            number,
            kind: RoomKind::Residential,
        }
    }

    pub fn office(number: u32) -> Self {
        Self {
            number,
            kind: RoomKind::Office,
        }
    }
}

/// Billing period of a payment document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    /// Create a period. Returns `None` for a month outside 1..=12.
    ///
    /// Two-digit years are read as 20YY.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if !(1..=12).contains(&month) || year < 0 {
            return None;
        }
        let year = if year < 100 { 2000 + year } else { year };
        Some(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn two_digit_year(&self) -> i32 {
        self.year % 100
    }

    /// Period as written to the export (`MM.YYYY`).
    pub fn display(&self) -> String {
        format!("{:02}.{}", self.month, self.year)
    }

    /// Document number: two-digit year, two-digit month, then the account.
    pub fn document_number(&self, account: &str) -> String {
        format!("{:02}{:02}{}", self.two_digit_year(), self.month, account)
    }
}

/// Capital repair (капитальный ремонт) figures of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalRepair {
    /// Contribution per square metre.
    pub rate: Decimal,
    /// Charged for the period.
    pub charged: Decimal,
    /// Recalculation, only when the source cell was filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recalculation: Option<Decimal>,
    /// Amount due.
    pub total: Decimal,
}

/// Header fields extracted from one payment document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    /// Billing period.
    pub period: Period,

    /// Personal account printed on the document (л/с).
    pub account: String,

    /// Generated document number shared by every emitted row.
    pub document_number: String,

    /// Premises the document was issued for.
    pub room: RoomKey,

    /// Living area in square metres.
    pub area: Decimal,

    /// Settlement bank account (р/счет).
    pub bank_account: String,

    /// Bank routing code (БИК).
    pub bik: String,

    /// Unique premises identifier from the rooms reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,

    /// GIS ZHKH account identifier from the accounts reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gis_account: Option<String>,

    /// Capital repair section.
    pub capital_repair: CapitalRepair,

    /// Document total (Итого).
    pub total: Decimal,
}

/// Classification of a service line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceClassification {
    /// Service name in the GIS ZHKH vocabulary.
    pub canonical_name: String,
    /// Individual consumption; false means common-property (OI) consumption.
    pub individual: bool,
    /// Additional (non-utility) service.
    pub additional: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_number() {
        let period = Period::new(1, 2024).unwrap();
        assert_eq!(period.document_number("123456"), "2401123456");
        assert_eq!(period.display(), "01.2024");
    }

    #[test]
    fn test_two_digit_year_input() {
        let period = Period::new(11, 7).unwrap();
        assert_eq!(period.year(), 2007);
        assert_eq!(period.document_number("42"), "071142");
        assert_eq!(period.display(), "11.2007");
    }

    #[test]
    fn test_invalid_month() {
        assert!(Period::new(0, 2024).is_none());
        assert!(Period::new(13, 2024).is_none());
    }

    #[test]
    fn test_room_key_equality() {
        assert_eq!(RoomKey::residential(5), RoomKey::residential(5));
        assert_ne!(RoomKey::residential(5), RoomKey::office(5));
    }
}
