//! Numeric cell parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::layout::AMOUNT_PATTERN;

/// Reading of a numeric cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCell {
    /// Blank cell; counts as zero.
    Empty,
    Value(Decimal),
    /// Non-empty text that is not a number.
    Invalid,
}

impl AmountCell {
    /// Value of the cell, zero for blank and invalid cells.
    pub fn or_zero(self) -> Decimal {
        match self {
            AmountCell::Value(v) => v,
            AmountCell::Empty | AmountCell::Invalid => Decimal::ZERO,
        }
    }
}

/// Classify the text of a numeric cell.
pub fn read_amount(text: &str) -> AmountCell {
    if text.trim().is_empty() {
        return AmountCell::Empty;
    }
    match parse_amount(text) {
        Some(v) => AmountCell::Value(v),
        None => AmountCell::Invalid,
    }
}

/// Parse an amount such as `1 234,56`, `1234.56` or `-0,5`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{00a0}')
        .collect();

    // Full float precision as written by spreadsheets, e.g. 0.30000000000000004.
    if let Ok(value) = Decimal::from_str(&cleaned) {
        return Some(value);
    }

    if !AMOUNT_PATTERN.is_match(&cleaned) {
        return None;
    }
    Decimal::from_str(&cleaned.replace(',', ".")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("1 234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("1\u{00a0}234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("-0,5"), Some(Decimal::new(-5, 1)));
        assert_eq!(parse_amount("44"), Some(Decimal::new(44, 0)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1,2,3"), None);
    }

    #[test]
    fn test_read_amount() {
        assert_eq!(read_amount(""), AmountCell::Empty);
        assert_eq!(read_amount("   "), AmountCell::Empty);
        assert_eq!(read_amount("12.5"), AmountCell::Value(Decimal::new(125, 1)));
        assert_eq!(read_amount("н/д"), AmountCell::Invalid);
        assert_eq!(read_amount("н/д").or_zero(), Decimal::ZERO);
    }
}
