//! Cutoff date parsing and timestamp formatting.

use crate::error::CleanupError;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::time::SystemTime;

/// Display format for modification dates in reports.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Result<NaiveDate, CleanupError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        CleanupError::InvalidDate {
            input: date_str.to_string(),
        }
    })
}

/// Convert a calendar date to local midnight as a SystemTime.
///
/// When midnight occurs twice (clocks moved back) the earlier instant wins.
pub fn local_midnight(date: NaiveDate) -> Result<SystemTime, CleanupError> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or(CleanupError::InvalidCutoff { date })?;
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or(CleanupError::InvalidCutoff { date })?;

    Ok(local.into())
}

/// Format a modification time as DD-MM-YYYY in the local time zone
pub fn format_date(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format(DISPLAY_DATE_FORMAT).to_string()
}
