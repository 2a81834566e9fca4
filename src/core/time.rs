//! Calendar helpers. Everything downstream takes `today` as an argument;
//! only the command-line surface reads the clock.

use chrono::{Local, NaiveDate};

use crate::core::error::OskarError;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `today` until `deadline`; negative when overdue.
pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, OskarError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        OskarError::ValidationError(format!("Invalid date '{}' (expected YYYY-MM-DD): {}", raw, e))
    })
}
