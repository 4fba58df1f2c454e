use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

use crate::models::Task;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Column headers for the grid, starting on Sunday.
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A calendar month, used as the reference for the day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRef {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthRef {
    /// Returns `None` if `month` is not in 1..=12 or `year` is outside the
    /// range chrono can represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let years = NaiveDate::MIN.year()..=NaiveDate::MAX.year();
        ((1..=12).contains(&month) && years.contains(&year)).then_some(Self { year, month })
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Moves forward (or backward, for negative `months`) across year boundaries.
    /// Returns `None` when the result falls outside the representable years.
    pub fn shift(self, months: i32) -> Option<Self> {
        let index = i64::from(self.year)
            .checked_mul(12)?
            .checked_add(i64::from(self.month) - 1)?
            .checked_add(i64::from(months))?;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        Self::new(year, index.rem_euclid(12) as u32 + 1)
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in the month, 28 to 31.
    pub fn days_in_month(self) -> Option<u32> {
        let first = self.first_day()?;
        let days = first.iter_days().take_while(|d| d.month() == self.month).count();
        u32::try_from(days).ok()
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

/// One slot of the month grid.
#[derive(Debug, Clone, PartialEq)]
pub enum DayCell<'a> {
    /// Padding before the first day of the month.
    Blank,
    Day { date: NaiveDate, tasks: Vec<&'a Task> },
}

impl<'a> DayCell<'a> {
    pub fn day(&self) -> Option<u32> {
        match self {
            DayCell::Blank => None,
            DayCell::Day { date, .. } => Some(date.day()),
        }
    }

    pub fn tasks(&self) -> &[&'a Task] {
        match self {
            DayCell::Blank => &[],
            DayCell::Day { tasks, .. } => tasks,
        }
    }
}

/// Builds the day grid for `month`/`year`.
///
/// The grid starts with one blank per weekday before the 1st (Sunday = 0),
/// then has one cell per day. A day's tasks are those whose `specific_date`
/// is that day, in source order. An invalid month yields an empty grid.
pub fn build(month: u32, year: i32, tasks: &[Task]) -> Vec<DayCell<'_>> {
    let Some(reference) = MonthRef::new(year, month) else {
        return Vec::new();
    };
    let (Some(first), Some(days)) = (reference.first_day(), reference.days_in_month()) else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.extend(std::iter::repeat_with(|| DayCell::Blank).take(leading));
    for date in first.iter_days().take(days as usize) {
        let on_day = tasks
            .iter()
            .filter(|t| t.specific_date == Some(date))
            .collect();
        cells.push(DayCell::Day { date, tasks: on_day });
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_rolls_over_years() {
        let dec = MonthRef::new(2023, 12).unwrap();
        assert_eq!(dec.shift(1), MonthRef::new(2024, 1));
        assert_eq!(dec.shift(1).and_then(|m| m.shift(-1)), Some(dec));
        assert_eq!(MonthRef::new(2024, 1).unwrap().shift(-1), Some(dec));
        assert_eq!(dec.shift(-24), MonthRef::new(2021, 12));
        assert_eq!(dec.shift(13), MonthRef::new(2025, 1));
    }

    #[test]
    fn shift_outside_representable_years_is_none() {
        assert!(MonthRef::new(200_000_000, 3).is_none());
        let last = MonthRef::new(NaiveDate::MAX.year(), 12).unwrap();
        assert_eq!(last.shift(1), None);
        assert!(last.days_in_month().is_some());
        assert_eq!(MonthRef::new(2024, 1).unwrap().shift(i32::MAX), None);
        assert_eq!(MonthRef::new(2024, 1).unwrap().shift(i32::MIN), None);
    }

    #[test]
    fn month_lengths() {
        let len = |y, m| MonthRef::new(y, m).unwrap().days_in_month().unwrap();
        assert_eq!(len(2024, 2), 29);
        assert_eq!(len(2023, 2), 28);
        assert_eq!(len(1900, 2), 28);
        assert_eq!(len(2000, 2), 29);
        assert_eq!(len(2024, 4), 30);
        assert_eq!(len(2024, 12), 31);
    }

    #[test]
    fn invalid_month_is_empty() {
        assert!(build(0, 2024, &[]).is_empty());
        assert!(build(13, 2024, &[]).is_empty());
        assert!(MonthRef::new(2024, 13).is_none());
    }

    #[test]
    fn display_name() {
        assert_eq!(MonthRef::new(2024, 2).unwrap().to_string(), "February 2024");
    }
}
