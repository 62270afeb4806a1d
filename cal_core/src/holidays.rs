//! # Holiday Rule Engine
//!
//! Computes the Japanese national holidays for a year. The engine is a set of
//! pure functions: every rule takes the year explicitly and returns fresh
//! records, nothing is cached between calls.
//!
//! ## Passes
//!
//! 1. [`compute_holidays`] - the statutory holidays themselves (kind `Holiday`)
//! 2. [`apply_substitute_holidays`] - a holiday on a Sunday moves its day off
//!    to the next date that is not itself a holiday (振替休日)
//! 3. [`apply_national_holidays`] - a day sandwiched between two holidays
//!    becomes a holiday too (国民の休日)
//!
//! Passes 2 and 3 only look at the `Holiday` records already in the list, so
//! they never react to each other's output.
//!
//! ## Example
//!
//! ```rust
//! use cal_core::holidays::compute_year_holidays;
//! use cal_core::offday::OffDayKind;
//!
//! let list = compute_year_holidays(2024).unwrap();
//!
//! // 2024-02-11 was a Sunday, so the 12th is a substitute holiday
//! let sub = list.iter().find(|r| r.same_date(2024, 2, 12)).unwrap();
//! assert_eq!(sub.kind, OffDayKind::SubstituteHoliday);
//! ```

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::dates::{add_days, first_weekday, weekday_of};
use crate::errors::{CalError, CalResult};
use crate::offday::{contains_date_of_kind, sort_by_date, OffDayKind, OffDayRecord};

/// Name given to substitute holidays
pub const SUBSTITUTE_HOLIDAY_NAME: &str = "振替休日";

/// Name given to bridge holidays
pub const NATIONAL_HOLIDAY_NAME: &str = "国民の休日";

/// Equinox formula coefficients `(A, B)` in millionths.
///
/// The day of month is `floor(A + B*(year-1900) - floor((year-1900)/4))`.
/// Only a reasonable approximation for roughly 1900-2100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquinoxCoefficients {
    pub a_micro: i64,
    pub b_micro: i64,
}

/// Vernal equinox (March): A = 21.4471, B = 0.242377
pub const VERNAL_EQUINOX: EquinoxCoefficients = EquinoxCoefficients {
    a_micro: 21_447_100,
    b_micro: 242_377,
};

/// Autumnal equinox (September): A = 23.8896, B = 0.242032
pub const AUTUMNAL_EQUINOX: EquinoxCoefficients = EquinoxCoefficients {
    a_micro: 23_889_600,
    b_micro: 242_032,
};

/// Holidays on the same month/day every year: (month, day, name)
const FIXED_HOLIDAYS: [(u32, u32, &str); 9] = [
    (1, 1, "元日"),
    (2, 11, "建国記念の日"),
    (2, 23, "天皇誕生日"),
    (4, 29, "昭和の日"),
    (5, 3, "憲法記念日"),
    (5, 4, "みどりの日"),
    (5, 5, "こどもの日"),
    (11, 3, "文化の日"),
    (11, 23, "勤労感謝の日"),
];

/// Holidays that exist in one year only: (year, month, day, name)
const ONE_OFF_HOLIDAYS: [(i32, u32, u32, &str); 2] = [
    (2019, 5, 1, "天皇の即位"),
    (2019, 10, 22, "即位礼正殿の儀"),
];

/// Day of month of an equinox for `year`.
///
/// Computed in integer millionths so the floor is exact.
///
/// ```
/// use cal_core::holidays::{equinox_day, AUTUMNAL_EQUINOX, VERNAL_EQUINOX};
/// assert_eq!(equinox_day(2021, AUTUMNAL_EQUINOX), 23);
/// assert_eq!(equinox_day(2024, VERNAL_EQUINOX), 20);
/// ```
pub fn equinox_day(year: i32, coefficients: EquinoxCoefficients) -> u32 {
    let n = i64::from(year) - 1900;
    let scaled = coefficients.a_micro + coefficients.b_micro * n;
    let day = scaled.div_euclid(1_000_000) - n.div_euclid(4);
    day as u32
}

/// Day of month of the `k`-th Monday (k >= 1) of a month.
///
/// With `w` the weekday of the 1st (0 = Sunday) this is
/// `1 + (8 - w) mod 7 + 7(k - 1)`.
pub fn nth_monday(year: i32, month: u32, k: u32) -> CalResult<u32> {
    if k == 0 {
        return Err(CalError::invalid_input("k", "0", "Week ordinal starts at 1"));
    }
    let w = first_weekday(year, month)?;
    Ok(1 + (8 - w) % 7 + 7 * (k - 1))
}

fn holiday(year: i32, month: u32, day: u32, name: &str) -> OffDayRecord {
    OffDayRecord::new(year, month, day, OffDayKind::Holiday, name)
}

/// The statutory holidays of `year`, date-sorted, all of kind `Holiday`.
///
/// Substitute and bridge holidays are not included; see
/// [`compute_year_holidays`].
pub fn compute_holidays(year: i32) -> CalResult<Vec<OffDayRecord>> {
    let mut list: Vec<OffDayRecord> = FIXED_HOLIDAYS
        .iter()
        .map(|&(month, day, name)| holiday(year, month, day, name))
        .collect();

    list.push(holiday(year, 1, nth_monday(year, 1, 2)?, "成人の日"));
    list.push(holiday(year, 3, equinox_day(year, VERNAL_EQUINOX), "春分の日"));

    // 2020 moved Marine Day, Sports Day and Mountain Day around the Olympics
    if year == 2020 {
        list.push(holiday(year, 7, 23, "海の日"));
        list.push(holiday(year, 7, 24, "スポーツの日"));
        list.push(holiday(year, 8, 10, "山の日"));
    } else {
        list.push(holiday(year, 7, nth_monday(year, 7, 3)?, "海の日"));
        list.push(holiday(year, 8, 11, "山の日"));
    }

    list.push(holiday(year, 9, nth_monday(year, 9, 3)?, "敬老の日"));
    list.push(holiday(year, 9, equinox_day(year, AUTUMNAL_EQUINOX), "秋分の日"));

    let sports_day = if year >= 2020 { "スポーツの日" } else { "体育の日" };
    list.push(holiday(year, 10, nth_monday(year, 10, 2)?, sports_day));

    list.extend(
        ONE_OFF_HOLIDAYS
            .iter()
            .filter(|&&(y, ..)| y == year)
            .map(|&(y, month, day, name)| holiday(y, month, day, name)),
    );

    sort_by_date(&mut list);
    debug!(year, count = list.len(), "computed statutory holidays");
    Ok(list)
}

/// Dates of the `Holiday` records in `list`. Records with impossible dates
/// are skipped.
fn holiday_dates(list: &[OffDayRecord]) -> BTreeSet<NaiveDate> {
    list.iter()
        .filter(|r| r.kind == OffDayKind::Holiday)
        .filter_map(|r| {
            let date = r.date();
            if date.is_none() {
                warn!(year = r.year, month = r.month, day = r.day, name = %r.name, "ignoring holiday with invalid date");
            }
            date
        })
        .collect()
}

fn push_unless_holiday(list: &mut Vec<OffDayRecord>, date: NaiveDate, kind: OffDayKind, name: &str) {
    let (year, month, day) = (date.year(), date.month(), date.day());
    if contains_date_of_kind(list, year, month, day, OffDayKind::Holiday)
        || contains_date_of_kind(list, year, month, day, kind)
    {
        return;
    }
    list.push(OffDayRecord::new(year, month, day, kind, name));
}

/// Add a `SubstituteHoliday` for every `Holiday` that falls on a Sunday.
///
/// The substitute is the first following date that is not itself a holiday,
/// found by stepping one day at a time. The list is re-sorted afterwards.
pub fn apply_substitute_holidays(list: &mut Vec<OffDayRecord>) {
    let holidays = holiday_dates(list);

    let substitutes: Vec<NaiveDate> = holidays
        .iter()
        .filter(|&&date| weekday_of(date) == 0)
        .filter_map(|&sunday| {
            let mut candidate = add_days(sunday, 1)?;
            while holidays.contains(&candidate) {
                candidate = add_days(candidate, 1)?;
            }
            Some(candidate)
        })
        .collect();

    for date in substitutes {
        push_unless_holiday(list, date, OffDayKind::SubstituteHoliday, SUBSTITUTE_HOLIDAY_NAME);
    }
    sort_by_date(list);
}

/// Add a `NationalHoliday` for every non-holiday `d + 1` where both `d` and
/// `d + 2` are holidays. The list is re-sorted afterwards.
pub fn apply_national_holidays(list: &mut Vec<OffDayRecord>) {
    let holidays = holiday_dates(list);

    let bridges: Vec<NaiveDate> = holidays
        .iter()
        .filter_map(|&date| {
            let next = add_days(date, 1)?;
            let after_next = add_days(date, 2)?;
            (holidays.contains(&after_next) && !holidays.contains(&next)).then_some(next)
        })
        .collect();

    for date in bridges {
        push_unless_holiday(list, date, OffDayKind::NationalHoliday, NATIONAL_HOLIDAY_NAME);
    }
    sort_by_date(list);
}

/// All holidays of `year`: statutory, substitute and bridge holidays,
/// date-sorted.
pub fn compute_year_holidays(year: i32) -> CalResult<Vec<OffDayRecord>> {
    let mut list = compute_holidays(year)?;
    apply_substitute_holidays(&mut list);
    apply_national_holidays(&mut list);
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(list: &'a [OffDayRecord], month: u32, day: u32) -> Option<&'a OffDayRecord> {
        list.iter().find(|r| r.month == month && r.day == day)
    }

    #[test]
    fn test_equinox_formula() {
        // floor(23.8896 + 0.242032*121 - floor(121/4)) = floor(53.175 - 30) = 23
        assert_eq!(equinox_day(2021, AUTUMNAL_EQUINOX), 23);
        assert_eq!(equinox_day(2024, AUTUMNAL_EQUINOX), 22);
        assert_eq!(equinox_day(2019, VERNAL_EQUINOX), 21);
        assert_eq!(equinox_day(2024, VERNAL_EQUINOX), 20);
    }

    #[test]
    fn test_nth_monday() {
        // January 2024 starts on a Monday
        assert_eq!(nth_monday(2024, 1, 1).unwrap(), 1);
        assert_eq!(nth_monday(2024, 1, 2).unwrap(), 8);
        // September 2024 starts on a Sunday
        assert_eq!(nth_monday(2024, 9, 3).unwrap(), 16);
        // October 2024 starts on a Tuesday
        assert_eq!(nth_monday(2024, 10, 2).unwrap(), 14);

        let err = nth_monday(2024, 10, 0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_autumnal_equinox_2021() {
        let list = compute_holidays(2021).unwrap();
        let record = find(&list, 9, 23).unwrap();
        assert_eq!(record.name, "秋分の日");
        assert_eq!(record.kind, OffDayKind::Holiday);
    }

    #[test]
    fn test_2020_olympic_moves() {
        let list = compute_holidays(2020).unwrap();
        assert_eq!(find(&list, 7, 23).unwrap().name, "海の日");
        assert_eq!(find(&list, 7, 24).unwrap().name, "スポーツの日");
        assert_eq!(find(&list, 8, 10).unwrap().name, "山の日");
        assert!(find(&list, 8, 11).is_none());
        // 3rd Monday of July 2020 would have been the 20th
        assert!(find(&list, 7, 20).is_none());
        // The October Sports Day is still produced
        assert_eq!(find(&list, 10, 12).unwrap().name, "スポーツの日");
    }

    #[test]
    fn test_sports_day_name_before_2020() {
        let list = compute_holidays(2019).unwrap();
        assert_eq!(find(&list, 10, 14).unwrap().name, "体育の日");
    }

    #[test]
    fn test_2019_enthronement() {
        let list = compute_holidays(2019).unwrap();
        assert_eq!(find(&list, 5, 1).unwrap().name, "天皇の即位");
        assert_eq!(find(&list, 10, 22).unwrap().name, "即位礼正殿の儀");

        let later = compute_holidays(2020).unwrap();
        assert!(find(&later, 10, 22).is_none());
    }

    #[test]
    fn test_holidays_are_unique_and_in_year() {
        for year in 1990..=2060 {
            let list = compute_holidays(year).unwrap();
            assert!(list.iter().all(|r| r.year == year && r.kind == OffDayKind::Holiday));
            assert!(list.iter().all(|r| r.date().is_some()));
            for pair in list.windows(2) {
                assert!(pair[0].date_key() < pair[1].date_key(), "duplicate in {}", year);
            }
        }
    }

    #[test]
    fn test_substitute_holidays_2024() {
        let list = compute_year_holidays(2024).unwrap();
        let substitutes: Vec<(u32, u32)> = list
            .iter()
            .filter(|r| r.kind == OffDayKind::SubstituteHoliday)
            .map(|r| (r.month, r.day))
            .collect();
        assert_eq!(substitutes, vec![(2, 12), (5, 6), (8, 12), (9, 23), (11, 4)]);
        assert!(list
            .iter()
            .filter(|r| r.kind == OffDayKind::SubstituteHoliday)
            .all(|r| r.name == SUBSTITUTE_HOLIDAY_NAME));
    }

    #[test]
    fn test_substitute_skips_following_holidays() {
        // 2020-05-03 is a Sunday; the 4th and 5th are holidays, so the 6th is the substitute
        let list = compute_year_holidays(2020).unwrap();
        let record = find(&list, 5, 6).unwrap();
        assert_eq!(record.kind, OffDayKind::SubstituteHoliday);
        assert!(!list
            .iter()
            .any(|r| r.kind == OffDayKind::SubstituteHoliday && r.month == 5 && r.day == 4));
    }

    #[test]
    fn test_national_holidays() {
        // 2019: 4/29 and 5/1 bridge 4/30, 5/1 and 5/3 bridge 5/2
        let list = compute_year_holidays(2019).unwrap();
        assert_eq!(find(&list, 4, 30).unwrap().kind, OffDayKind::NationalHoliday);
        assert_eq!(find(&list, 5, 2).unwrap().kind, OffDayKind::NationalHoliday);
        assert_eq!(find(&list, 5, 2).unwrap().name, NATIONAL_HOLIDAY_NAME);

        // 2015 Silver Week: 9/21 and 9/23 bridge 9/22
        let list = compute_year_holidays(2015).unwrap();
        assert_eq!(find(&list, 9, 22).unwrap().kind, OffDayKind::NationalHoliday);
    }

    #[test]
    fn test_passes_ignore_each_other() {
        // Hand-built set: Sunday 2023-01-01, Tuesday 2023-01-03
        let mut list = vec![
            holiday(2023, 1, 1, "a"),
            holiday(2023, 1, 3, "b"),
        ];
        apply_substitute_holidays(&mut list);
        apply_national_holidays(&mut list);

        // Monday the 2nd is both the substitute and the bridge day
        let kinds: Vec<OffDayKind> = list
            .iter()
            .filter(|r| r.same_date(2023, 1, 2))
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, vec![OffDayKind::SubstituteHoliday, OffDayKind::NationalHoliday]);
    }

    #[test]
    fn test_passes_are_idempotent() {
        let mut once = compute_year_holidays(2024).unwrap();
        let snapshot = once.clone();
        apply_substitute_holidays(&mut once);
        apply_national_holidays(&mut once);
        assert_eq!(once, snapshot);
    }

    #[test]
    fn test_substitute_crosses_year_end() {
        // A manual holiday on Sunday 2023-12-31 spills into the next year
        let mut list = vec![holiday(2023, 12, 31, "大晦日")];
        apply_substitute_holidays(&mut list);
        assert!(list
            .iter()
            .any(|r| r.kind == OffDayKind::SubstituteHoliday && r.same_date(2024, 1, 1)));
    }
}
