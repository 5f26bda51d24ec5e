//! Date parsing and display formats used by previews.

use chrono::NaiveDate;

use crate::error::{RecurrenceError, Result};

/// "Jan 15, 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// "Jan 15"
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// "Mon, Jan 15, 2024" -- the upcoming-occurrences list format.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%a, %b %d, %Y").to_string()
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// A trailing time component (`2024-01-15T09:30:00`) is accepted and dropped,
/// since recurrences work on whole local days.
///
/// # Errors
/// Returns `RecurrenceError::InvalidDate` if the string is not a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| RecurrenceError::InvalidDate(format!("'{}': {}", s, e)))
}
