use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;

/// Collapse internal whitespace and trim.
#[must_use]
pub fn clean_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cased, whitespace-collapsed payment reference.
#[must_use]
pub fn clean_reference(value: &str) -> String {
    clean_text(value).to_uppercase()
}

/// Parse a money cell, tolerating currency symbols and thousands
/// separators. Blank or unparsable cells become zero.
#[must_use]
pub fn parse_money(value: &str) -> BigDecimal {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or_else(|_| BigDecimal::zero())
}

/// Currency codes recognized in cells.
const CURRENCY_CODES: [&str; 10] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "HKD", "SGD",
];

/// Extract a currency code from a cell, defaulting to USD.
#[must_use]
pub fn normalize_currency(value: &str) -> String {
    let upper = value.to_uppercase();
    CURRENCY_CODES
        .iter()
        .find(|code| upper.contains(*code))
        .map_or_else(|| "USD".to_string(), |code| (*code).to_string())
}

/// Date formats accepted from spreadsheet exports.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d %b %Y"];

/// Parse a date cell across common spreadsheet formats.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
