//! # Monthly Grid Builder
//!
//! Lays a month out as week rows of seven cells (Sunday first) and tags every
//! cell with a [`DayType`] for the view layer to colour.
//!
//! ```text
//!        Su Mo Tu We Th Fr Sa
//! week 0  p  p  p  p  1  2  3     p = previous-month fill
//! week 1  4  5  6  7  8  9 10
//! ...
//! week 4 25 26 27 28 29  n  n     n = next-month fill
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cal_core::grid::{DayType, MonthGrid};
//!
//! let grid = MonthGrid::build(2024, 2, false, &[]).unwrap();
//! assert_eq!(grid.week_count, 5);
//! assert_eq!(grid.day_numbers[0][4], Some(1));
//! assert_eq!(grid.day_types[0][0], DayType::PreviousMonthFill);
//! ```

use serde::{Deserialize, Serialize};

use crate::dates::{days_in_month, first_weekday, prev_month};
use crate::errors::{CalError, CalResult};
use crate::offday::{contains_date_of_kind, OffDayKind, OffDayRecord};

/// Classification of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayType {
    Holiday,
    SubstituteHoliday,
    NationalHoliday,
    PersonalOffDay,
    OrdinaryWeekday,
    Sunday,
    Saturday,
    /// Blank (or overflow) cell before the 1st
    PreviousMonthFill,
    /// Blank (or overflow) cell after the last day
    NextMonthFill,
}

/// Off-day kinds that colour a day, highest priority first
const KIND_PRIORITY: [(OffDayKind, DayType); 4] = [
    (OffDayKind::Holiday, DayType::Holiday),
    (OffDayKind::SubstituteHoliday, DayType::SubstituteHoliday),
    (OffDayKind::NationalHoliday, DayType::NationalHoliday),
    (OffDayKind::PersonalOffDay, DayType::PersonalOffDay),
];

impl DayType {
    /// Single-letter tag, handy for compact text output
    pub fn code(&self) -> char {
        match self {
            DayType::Holiday => 'h',
            DayType::SubstituteHoliday => 's',
            DayType::NationalHoliday => 'e',
            DayType::PersonalOffDay => 'o',
            DayType::OrdinaryWeekday => 'g',
            DayType::Sunday => 'u',
            DayType::Saturday => 'a',
            DayType::PreviousMonthFill => 'p',
            DayType::NextMonthFill => 'n',
        }
    }

    /// Whether the cell belongs to a neighbouring month
    pub fn is_fill(&self) -> bool {
        matches!(self, DayType::PreviousMonthFill | DayType::NextMonthFill)
    }
}

/// Classify one day of the month.
///
/// Off-day records win over the weekday: Holiday, then SubstituteHoliday,
/// then NationalHoliday, then PersonalOffDay. Records of kind `None` do not
/// affect the classification. Otherwise weekday 0 is Sunday and 6 Saturday.
pub fn classify_day(year: i32, month: u32, day: u32, weekday: u32, offdays: &[OffDayRecord]) -> DayType {
    KIND_PRIORITY
        .iter()
        .find(|(kind, _)| contains_date_of_kind(offdays, year, month, day, *kind))
        .map(|&(_, day_type)| day_type)
        .unwrap_or(match weekday {
            0 => DayType::Sunday,
            6 => DayType::Saturday,
            _ => DayType::OrdinaryWeekday,
        })
}

/// 1-indexed week row of `day` within its month
///
/// ```
/// use cal_core::grid::week_of;
/// // February 2024 starts on a Thursday
/// assert_eq!(week_of(2024, 2, 3).unwrap(), 1);
/// assert_eq!(week_of(2024, 2, 4).unwrap(), 2);
/// assert_eq!(week_of(2024, 2, 29).unwrap(), 5);
/// ```
pub fn week_of(year: i32, month: u32, day: u32) -> CalResult<u32> {
    if day == 0 {
        return Err(CalError::invalid_date(year, month, day));
    }
    let first = first_weekday(year, month)?;
    Ok((day + first - 1) / 7 + 1)
}

/// One month laid out for display. Rebuilt on every navigation or edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Days in the month
    pub day_count: u32,
    /// Weekday of the 1st (0 = Sunday)
    pub first_weekday: u32,
    /// Number of week rows, `ceil((first_weekday + day_count) / 7)`
    pub week_count: u32,
    /// Day number per cell; `None` for blank cells
    pub day_numbers: Vec<[Option<u32>; 7]>,
    /// Classification per cell, parallel to `day_numbers`
    pub day_types: Vec<[DayType; 7]>,
}

impl MonthGrid {
    /// Build the grid for a month.
    ///
    /// With `include_overflow`, the leading blanks show the previous month's
    /// last days and the trailing blanks count up from 1. Overflow cells keep
    /// their fill tags.
    ///
    /// # Errors
    ///
    /// `CalError::InvalidDate` if `month` is not 1..=12 (or the year is out of
    /// the supported range).
    pub fn build(year: i32, month: u32, include_overflow: bool, offdays: &[OffDayRecord]) -> CalResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(CalError::invalid_date(year, month, 1));
        }

        let day_count = days_in_month(year, month)?;
        let first_weekday = first_weekday(year, month)?;
        let week_count = week_of(year, month, day_count)?;

        let mut day_numbers = vec![[None; 7]; week_count as usize];
        let mut day_types = vec![[DayType::OrdinaryWeekday; 7]; week_count as usize];

        for week in 0..week_count {
            for weekday in 0..7 {
                let cell = week * 7 + weekday;
                let (number, day_type) = if cell < first_weekday {
                    (None, DayType::PreviousMonthFill)
                } else if cell - first_weekday >= day_count {
                    (None, DayType::NextMonthFill)
                } else {
                    let day = cell - first_weekday + 1;
                    (Some(day), classify_day(year, month, day, weekday, offdays))
                };
                day_numbers[week as usize][weekday as usize] = number;
                day_types[week as usize][weekday as usize] = day_type;
            }
        }

        let mut grid = MonthGrid {
            year,
            month,
            day_count,
            first_weekday,
            week_count,
            day_numbers,
            day_types,
        };

        if include_overflow {
            grid.fill_overflow()?;
        }
        Ok(grid)
    }

    fn fill_overflow(&mut self) -> CalResult<()> {
        // Leading cells: the previous month's last days, ending on weekday first_weekday - 1
        let (prev_year, prev_month) = prev_month(self.year, self.month);
        let prev_days = days_in_month(prev_year, prev_month)?;
        let leading = self.first_weekday;
        for weekday in 0..leading {
            self.day_numbers[0][weekday as usize] = Some(prev_days - leading + 1 + weekday);
        }

        // Trailing cells: a plain 1, 2, 3 ... count
        let last = self.day_numbers.len() - 1;
        let trailing: Vec<usize> = (0..7)
            .filter(|&w| self.day_types[last][w] == DayType::NextMonthFill)
            .collect();
        for (offset, weekday) in trailing.into_iter().enumerate() {
            self.day_numbers[last][weekday] = Some(offset as u32 + 1);
        }
        Ok(())
    }

    /// Day number and type at a cell, `None` outside the grid
    pub fn cell(&self, week: usize, weekday: usize) -> Option<(Option<u32>, DayType)> {
        let number = *self.day_numbers.get(week)?.get(weekday)?;
        let day_type = self.day_types[week][weekday];
        Some((number, day_type))
    }

    /// Display text of a cell: the day number, or an empty string
    pub fn label(&self, week: usize, weekday: usize) -> String {
        match self.cell(week, weekday) {
            Some((Some(day), _)) => day.to_string(),
            _ => String::new(),
        }
    }

    /// Type of a day of this month
    pub fn day_type(&self, day: u32) -> Option<DayType> {
        if day == 0 || day > self.day_count {
            return None;
        }
        let cell = day + self.first_weekday - 1;
        Some(self.day_types[(cell / 7) as usize][(cell % 7) as usize])
    }
}
