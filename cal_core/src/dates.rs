//! Calendar arithmetic shared by the holiday rules and the grid builder.
//!
//! Weekdays are numbered from Sunday: 0 = Sunday .. 6 = Saturday.

use chrono::{Datelike, Days, NaiveDate};

use crate::errors::{CalError, CalResult};

/// Build a date, failing with [`CalError::InvalidDate`] if it does not exist.
pub fn ymd(year: i32, month: u32, day: u32) -> CalResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| CalError::invalid_date(year, month, day))
}

/// Gregorian leap year test
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in a month, leap-year aware.
///
/// ```
/// use cal_core::dates::days_in_month;
/// assert_eq!(days_in_month(2024, 2).unwrap(), 29);
/// assert_eq!(days_in_month(2023, 2).unwrap(), 28);
/// assert!(days_in_month(2024, 13).is_err());
/// ```
pub fn days_in_month(year: i32, month: u32) -> CalResult<u32> {
    let first = ymd(year, month, 1)?;
    let (next_year, next_month) = next_month(year, month);
    let next = ymd(next_year, next_month, 1)?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// Weekday number (0 = Sunday) of a date
pub fn weekday_of(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Weekday number (0 = Sunday) of the 1st of a month
pub fn first_weekday(year: i32, month: u32) -> CalResult<u32> {
    Ok(weekday_of(ymd(year, month, 1)?))
}

/// The month before `(year, month)`, wrapping the year at January
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The month after `(year, month)`, wrapping the year at December
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// `date` plus `days`, or `None` past the end of the representable range
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}
