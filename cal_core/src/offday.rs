//! # Off-Day Records
//!
//! An [`OffDayRecord`] marks one calendar day with a non-default status: a
//! public holiday, a substitute holiday, a bridge ("national") holiday,
//! personal leave, or just an annotation on an ordinary day.
//!
//! Records are immutable values. Changing a day means removing its record and
//! adding a new one (see [`crate::store::OffDayStore::update`]).
//!
//! ## Example
//!
//! ```rust
//! use cal_core::offday::{OffDayKind, OffDayRecord};
//!
//! let leave = OffDayRecord::new(2024, 5, 10, OffDayKind::PersonalOffDay, "夏休み");
//! assert_eq!(leave.kind.code(), 4);
//!
//! // Unknown numeric codes collapse to a plain annotated day
//! let odd = OffDayRecord::from_code(2024, 5, 11, 42, "memo", "");
//! assert_eq!(odd.kind, OffDayKind::None);
//! ```

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status of an off-day record.
///
/// The numeric codes are the ones written to the record file and must not be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OffDayKind {
    /// 0 - Not a day off; the record only carries a name/note
    #[default]
    None,
    /// 1 - Public holiday
    Holiday,
    /// 2 - Substitute holiday for a holiday that fell on a Sunday
    SubstituteHoliday,
    /// 3 - Weekday sandwiched between two holidays
    NationalHoliday,
    /// 4 - Personal leave
    PersonalOffDay,
}

impl OffDayKind {
    /// All kinds in code order
    pub const ALL: [OffDayKind; 5] = [
        OffDayKind::None,
        OffDayKind::Holiday,
        OffDayKind::SubstituteHoliday,
        OffDayKind::NationalHoliday,
        OffDayKind::PersonalOffDay,
    ];

    /// Numeric code used in the record file (0..=4)
    pub fn code(&self) -> u8 {
        match self {
            OffDayKind::None => 0,
            OffDayKind::Holiday => 1,
            OffDayKind::SubstituteHoliday => 2,
            OffDayKind::NationalHoliday => 3,
            OffDayKind::PersonalOffDay => 4,
        }
    }

    /// Kind for a numeric code, or `None` when the code is out of range.
    pub fn try_from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(OffDayKind::None),
            1 => Some(OffDayKind::Holiday),
            2 => Some(OffDayKind::SubstituteHoliday),
            3 => Some(OffDayKind::NationalHoliday),
            4 => Some(OffDayKind::PersonalOffDay),
            _ => None,
        }
    }

    /// Kind for a numeric code; anything out of range becomes [`OffDayKind::None`].
    ///
    /// ```
    /// use cal_core::offday::OffDayKind;
    /// assert_eq!(OffDayKind::from_code(2), OffDayKind::SubstituteHoliday);
    /// assert_eq!(OffDayKind::from_code(-1), OffDayKind::None);
    /// ```
    pub fn from_code(code: i64) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            OffDayKind::None => "なし",
            OffDayKind::Holiday => "祝日",
            OffDayKind::SubstituteHoliday => "振替休日",
            OffDayKind::NationalHoliday => "国民の休日",
            OffDayKind::PersonalOffDay => "休暇",
        }
    }

    /// Whether this kind is produced by the holiday rules (as opposed to a user entry)
    pub fn is_holiday_like(&self) -> bool {
        matches!(
            self,
            OffDayKind::Holiday | OffDayKind::SubstituteHoliday | OffDayKind::NationalHoliday
        )
    }
}

/// One persisted off-day entry.
///
/// `(year, month, day)` is expected to be a real calendar date. It is not
/// checked on construction; [`OffDayRecord::date`] returns `None` for a
/// triple that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffDayRecord {
    pub year: i32,
    /// Month (1..=12)
    pub month: u32,
    /// Day of month (1..=31)
    pub day: u32,
    pub kind: OffDayKind,
    /// Holiday or leave name, e.g. "元日"
    pub name: String,
    /// Free-form annotation; empty when absent
    pub note: String,
}

impl OffDayRecord {
    /// Create a record with an empty note.
    pub fn new(year: i32, month: u32, day: u32, kind: OffDayKind, name: impl Into<String>) -> Self {
        OffDayRecord {
            year,
            month,
            day,
            kind,
            name: name.into(),
            note: String::new(),
        }
    }

    /// Create a record from a raw kind code, clamping unknown codes to `None`.
    pub fn from_code(
        year: i32,
        month: u32,
        day: u32,
        code: i64,
        name: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        OffDayRecord::new(year, month, day, OffDayKind::from_code(code), name).with_note(note)
    }

    /// Replace the note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// The record's date, if it is calendar-valid
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Sort key
    pub fn date_key(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }

    /// Whether this record is for the given date
    pub fn same_date(&self, year: i32, month: u32, day: u32) -> bool {
        self.year == year && self.month == month && self.day == day
    }

    /// Whether two records share a date
    pub fn same_date_as(&self, other: &OffDayRecord) -> bool {
        self.date_key() == other.date_key()
    }
}

/// Order two records by `(year, month, day)` only.
pub fn compare_by_date(a: &OffDayRecord, b: &OffDayRecord) -> Ordering {
    a.date_key().cmp(&b.date_key())
}

/// Sort ascending by date. The sort is stable, so records sharing a date
/// keep their relative order.
pub fn sort_by_date(records: &mut [OffDayRecord]) {
    records.sort_by(compare_by_date);
}

/// Whether any record falls on the given date
pub fn contains_date(records: &[OffDayRecord], year: i32, month: u32, day: u32) -> bool {
    records.iter().any(|r| r.same_date(year, month, day))
}

/// Whether any record of `kind` falls on the given date
pub fn contains_date_of_kind(
    records: &[OffDayRecord],
    year: i32,
    month: u32,
    day: u32,
    kind: OffDayKind,
) -> bool {
    records
        .iter()
        .any(|r| r.kind == kind && r.same_date(year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_match_file_format() {
        for kind in OffDayKind::ALL {
            assert_eq!(OffDayKind::from_code(kind.code() as i64), kind);
        }
        assert_eq!(OffDayKind::NationalHoliday.code(), 3);
        assert_eq!(OffDayKind::PersonalOffDay.code(), 4);
    }

    #[test]
    fn test_out_of_range_code_clamps_to_none() {
        assert_eq!(OffDayKind::from_code(5), OffDayKind::None);
        assert_eq!(OffDayKind::from_code(-3), OffDayKind::None);
        assert_eq!(OffDayKind::try_from_code(5), None);

        let record = OffDayRecord::from_code(2024, 1, 1, 99, "x", "y");
        assert_eq!(record.kind, OffDayKind::None);
        assert_eq!(record.note, "y");
    }

    #[test]
    fn test_holiday_like_kinds() {
        assert!(OffDayKind::NationalHoliday.is_holiday_like());
        assert!(!OffDayKind::PersonalOffDay.is_holiday_like());
        assert_eq!(OffDayKind::SubstituteHoliday.label(), "振替休日");
    }

    #[test]
    fn test_date_validity() {
        let leap = OffDayRecord::new(2024, 2, 29, OffDayKind::None, "");
        assert!(leap.date().is_some());

        let bogus = OffDayRecord::new(2023, 2, 29, OffDayKind::None, "");
        assert!(bogus.date().is_none());
    }

    #[test]
    fn test_sort_is_stable_for_same_date() {
        let mut records = vec![
            OffDayRecord::new(2024, 5, 10, OffDayKind::PersonalOffDay, "b"),
            OffDayRecord::new(2024, 1, 1, OffDayKind::Holiday, "元日"),
            OffDayRecord::new(2024, 5, 10, OffDayKind::None, "a"),
            OffDayRecord::new(2023, 12, 31, OffDayKind::None, "大晦日"),
        ];
        sort_by_date(&mut records);

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["大晦日", "元日", "b", "a"]);
    }

    #[test]
    fn test_contains_date_of_kind() {
        let records = vec![OffDayRecord::new(2024, 5, 10, OffDayKind::PersonalOffDay, "x")];
        assert!(contains_date(&records, 2024, 5, 10));
        assert!(contains_date_of_kind(&records, 2024, 5, 10, OffDayKind::PersonalOffDay));
        assert!(!contains_date_of_kind(&records, 2024, 5, 10, OffDayKind::Holiday));
        assert!(!contains_date(&records, 2024, 5, 11));
    }
}
