//! Billing period parsing ("Январь 2024").

use chrono::Month;

use super::layout::PERIOD_PATTERN;
use crate::error::ExtractionError;
use crate::models::document::Period;

/// Russian month names in nominative case, as printed in document headers.
const MONTH_NAMES: [(&str, Month); 12] = [
    ("январь", Month::January),
    ("февраль", Month::February),
    ("март", Month::March),
    ("апрель", Month::April),
    ("май", Month::May),
    ("июнь", Month::June),
    ("июль", Month::July),
    ("август", Month::August),
    ("сентябрь", Month::September),
    ("октябрь", Month::October),
    ("ноябрь", Month::November),
    ("декабрь", Month::December),
];

/// Month number (1-12) for a month name, ignoring case.
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, month)| month.number_from_month())
}

/// Parse the anchored period text, e.g. `Январь 2024` or `Январь 24`.
pub fn parse_period(text: &str) -> Result<Period, ExtractionError> {
    let parse_error = || ExtractionError::Parse {
        field: "period".to_string(),
        value: text.to_string(),
    };

    let caps = PERIOD_PATTERN.captures(text.trim()).ok_or_else(parse_error)?;
    let month = month_from_name(&caps[1])
        .ok_or_else(|| ExtractionError::UnknownMonth(caps[1].to_string()))?;
    let year: i32 = caps[2].parse().map_err(|_| parse_error())?;

    Period::new(month, year).ok_or_else(parse_error)
}
