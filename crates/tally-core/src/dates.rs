//! Date parsing and formatting for ledger cells
//!
//! Ledger dates are written `dd-mm-yyyy`. Older rows and request parameters
//! may use ISO `yyyy-mm-dd`. Formats are tried in order; the first that parses
//! wins.

use chrono::{NaiveDate, NaiveDateTime};

/// Accepted ledger date formats, in the order they are tried
pub const LEDGER_DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y", // 15-01-2025 (canonical)
    "%Y-%m-%d", // 2025-01-15
];

/// Accepted formats for request parameters (custom ranges, goal target dates)
pub const PARAM_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2025-01-15
    "%d-%m-%Y", // 15-01-2025
];

/// Canonical format used when writing ledger dates
pub const CANONICAL_FORMAT: &str = "%d-%m-%Y";

/// Parse a date trying each format in order
pub fn parse_with_formats(s: &str, formats: &[&str]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a ledger date cell
pub fn parse_ledger_date(s: &str) -> Option<NaiveDate> {
    parse_with_formats(s, LEDGER_DATE_FORMATS)
}

/// Parse a request parameter date (ISO first)
pub fn parse_param_date(s: &str) -> Option<NaiveDate> {
    parse_with_formats(s, PARAM_DATE_FORMATS)
}

/// Format a date in the canonical ledger form
pub fn format_ledger_date(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Midnight at the start of the day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// 23:59:59 at the end of the day
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| start_of_day(date))
}

/// Short display form: "Dec 01"
pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Long display form: "Dec 01, 2024"
pub fn long_label(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}
