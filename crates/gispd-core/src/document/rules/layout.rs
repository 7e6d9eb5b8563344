//! Labels, anchors and patterns of the payment document layout.

use lazy_static::lazy_static;
use regex::Regex;

// Row labels (first column).
pub const LABEL_SERVICES: &str = "Услуга";
pub const LABEL_TOTAL: &str = "Итого";
pub const LABEL_CAPITAL_REPAIR: &str = "Отчисления на капитальный ремонт";

// Service rows diverted before classification.
pub const SERVICE_PENALTY: &str = "пеня";
pub const SERVICE_MAINTENANCE: &str = "текущее содержание";

// Header anchors.
pub const PERIOD_PREFIX: &str = "Платежный документ (счёт) за ";
pub const PERIOD_SUFFIX: &str = " г.";
pub const ACCOUNT_PREFIX: &str = "л/с ";
pub const ROOM_MARKER: &str = "кв. ";
pub const AREA_BEFORE: &str = "Пл.:  ";
pub const AREA_AFTER: &str = " кв.м.";
pub const BANK_ACCOUNT_BEFORE: &str = "р/счет ";
pub const BANK_ACCOUNT_AFTER: &str = " ";
pub const BIK_BEFORE: &str = "БИК ";

/// Column offsets of the service table.
pub mod columns {
    pub const NAME: usize = 0;
    pub const TARIFF: usize = 4;
    pub const VOLUME: usize = 5;
    pub const CHARGED: usize = 6;
    pub const RECALCULATION: usize = 7;
    /// Capital repair row only.
    pub const CAPITAL_REPAIR_TOTAL: usize = 8;
    pub const AMOUNT_DUE: usize = 10;
}

lazy_static! {
    /// Period text after anchoring: month name and 2- or 4-digit year.
    pub static ref PERIOD_PATTERN: Regex = Regex::new(
        r"^(\S+)\s+(\d{4}|\d{2})$"
    ).unwrap();

    /// Leading number, e.g. the flat number in "57, подъезд 2".
    pub static ref LEADING_NUMBER: Regex = Regex::new(
        r"^\s*(\d+)"
    ).unwrap();

    /// Plain decimal amount with `.` or `,` separator.
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"^[-+]?\d+(?:[.,]\d+)?$"
    ).unwrap();
}
