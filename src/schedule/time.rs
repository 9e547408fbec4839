//! Delivery-time helpers
//!
//! Schedule times are minute-granularity wall-clock values, always rounded
//! to the nearest 10-minute boundary before persistence.

use crate::error::{DailyFetchError, Result};
use chrono::{NaiveTime, Timelike};

/// Round a time to the nearest 10-minute boundary
///
/// Ties round up, and minutes past :55 roll into the next hour (23:55 and
/// later wrap to 00:00). Idempotent: rounding a rounded time is a no-op.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use dailyfetch::schedule::round_to_ten_minutes;
///
/// let t = NaiveTime::from_hms_opt(8, 5, 0).unwrap();
/// assert_eq!(round_to_ten_minutes(t), NaiveTime::from_hms_opt(8, 10, 0).unwrap());
/// ```
pub fn round_to_ten_minutes(time: NaiveTime) -> NaiveTime {
    let total = time.hour() * 60 + time.minute();
    let rounded = ((total + 5) / 10) * 10 % (24 * 60);
    NaiveTime::from_hms_opt(rounded / 60, rounded % 60, 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).expect("midnight is a valid time"))
}

/// Parse an "HH:MM" wire string into a time
///
/// # Errors
///
/// Returns `DailyFetchError::Validation` when the string is not "HH:MM"
pub fn parse_schedule_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| DailyFetchError::Validation(format!("Invalid time '{}': {}", s, e)).into())
}

/// Format a time as the "HH:MM" wire string
pub fn format_schedule_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
