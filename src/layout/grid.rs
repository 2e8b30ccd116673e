use std::fmt;

use chrono::{Datelike, Months, NaiveDate};

use super::error::{LayoutError, LayoutResult};

pub const DAYS_PER_WEEK: u32 = 7;

/// Monday-first weekday headers, matching the column order of the grid.
pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A displayed month. Holds the first and last day so that every derived
/// quantity is infallible once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
    last: NaiveDate,
}

/// Position of a day inside the week-wrapped grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayCoordinate {
    pub week: u32,
    pub column: u32,
}

impl CalendarMonth {
    /// `month` is 1-based (January = 1), as everywhere in chrono.
    pub fn new(year: i32, month: u32) -> LayoutResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LayoutError::OutOfRange {
                what: "month",
                value: month as i64,
                min: 1,
                max: 12,
            });
        }

        let out_of_range_year = || LayoutError::OutOfRange {
            what: "year",
            value: year as i64,
            min: NaiveDate::MIN.year() as i64,
            max: NaiveDate::MAX.year() as i64,
        };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range_year)?;
        let last = last_of_month(first).ok_or_else(out_of_range_year)?;

        Ok(Self { first, last })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = last_of_month(first).unwrap_or(date);
        Self { first, last }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn days_in_month(&self) -> u32 {
        self.last.day()
    }

    /// Blank leading cells before day 1, Monday = 0 .. Sunday = 6.
    pub fn weekday_offset(&self) -> u32 {
        (self.first.weekday().num_days_from_sunday() + 6) % DAYS_PER_WEEK
    }

    pub fn week_count(&self) -> u32 {
        (self.weekday_offset() + self.days_in_month()).div_ceil(DAYS_PER_WEEK)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    pub fn date_of(&self, day: u32) -> LayoutResult<NaiveDate> {
        self.check_day(day)?;
        Ok(self.first.with_day(day).unwrap_or(self.first))
    }

    pub fn coordinate_of(&self, day: u32) -> LayoutResult<DayCoordinate> {
        self.check_day(day)?;
        let cell = self.weekday_offset() + day - 1;
        Ok(DayCoordinate {
            week: cell / DAYS_PER_WEEK,
            column: cell % DAYS_PER_WEEK,
        })
    }

    /// Coordinate of a date that is known to fall inside this month.
    pub fn coordinate_of_date(&self, date: NaiveDate) -> LayoutResult<DayCoordinate> {
        if !self.contains(date) {
            return Err(LayoutError::OutOfRange {
                what: "date",
                value: date.signed_duration_since(self.first).num_days() + 1,
                min: 1,
                max: self.days_in_month() as i64,
            });
        }
        self.coordinate_of(date.day())
    }

    /// Inverse of [`Self::coordinate_of`]. `None` for the blank cells before
    /// day 1 and after the last day.
    pub fn day_of_month_at(&self, week: u32, column: u32) -> Option<u32> {
        if column >= DAYS_PER_WEEK {
            return None;
        }
        let cell = (week * DAYS_PER_WEEK + column) as i64;
        let day = cell - self.weekday_offset() as i64 + 1;
        (1..=self.days_in_month() as i64)
            .contains(&day)
            .then_some(day as u32)
    }

    pub fn succ(&self) -> Option<Self> {
        let (year, month) = if self.month() == 12 {
            (self.year().checked_add(1)?, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        Self::new(year, month).ok()
    }

    pub fn pred(&self) -> Option<Self> {
        let (year, month) = if self.month() == 1 {
            (self.year().checked_sub(1)?, 12)
        } else {
            (self.year(), self.month() - 1)
        };
        Self::new(year, month).ok()
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month()), self.year())
    }

    fn check_day(&self, day: u32) -> LayoutResult<()> {
        let days = self.days_in_month();
        if day < 1 || day > days {
            return Err(LayoutError::OutOfRange {
                what: "day of month",
                value: day as i64,
                min: 1,
                max: days as i64,
            });
        }
        Ok(())
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

pub fn weekday_offset(year: i32, month: u32) -> LayoutResult<u32> {
    Ok(CalendarMonth::new(year, month)?.weekday_offset())
}

pub fn week_count(year: i32, month: u32) -> LayoutResult<u32> {
    Ok(CalendarMonth::new(year, month)?.week_count())
}

pub fn coordinate_of(year: i32, month: u32, day: u32) -> LayoutResult<DayCoordinate> {
    CalendarMonth::new(year, month)?.coordinate_of(day)
}

pub fn day_of_month_at(year: i32, month: u32, week: u32, column: u32) -> LayoutResult<Option<u32>> {
    Ok(CalendarMonth::new(year, month)?.day_of_month_at(week, column))
}

/// Day before the first of the next month. December of the last year chrono
/// can represent has no next month, so it ends on the 31st.
fn last_of_month(first: NaiveDate) -> Option<NaiveDate> {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.pred_opt(),
        None => first.with_day(31),
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32) -> CalendarMonth {
        CalendarMonth::new(year, month).unwrap()
    }

    #[test]
    fn february_2024_geometry() {
        let feb = month(2024, 2);
        assert_eq!(feb.days_in_month(), 29);
        assert_eq!(feb.weekday_offset(), 3); // Thursday
        assert_eq!(feb.week_count(), 5);
        assert_eq!(feb.day_of_month_at(0, 3), Some(1));
        assert_eq!(feb.coordinate_of(29).unwrap(), DayCoordinate { week: 4, column: 3 });
        assert_eq!(feb.day_of_month_at(0, 2), None);
        assert_eq!(feb.day_of_month_at(4, 4), None);
    }

    #[test]
    fn month_starting_on_monday_has_no_leading_blanks() {
        // January 2024 begins on a Monday.
        let jan = month(2024, 1);
        assert_eq!(jan.weekday_offset(), 0);
        assert_eq!(jan.week_count(), 5);
        assert_eq!(jan.coordinate_of(1).unwrap(), DayCoordinate { week: 0, column: 0 });
    }

    #[test]
    fn month_starting_on_sunday_needs_six_rows() {
        // September 2024 begins on a Sunday and has 30 days.
        let sep = month(2024, 9);
        assert_eq!(sep.weekday_offset(), 6);
        assert_eq!(sep.week_count(), 6);
        assert_eq!(sep.coordinate_of(30).unwrap(), DayCoordinate { week: 5, column: 0 });
    }

    #[test]
    fn non_leap_february_can_fill_exactly_four_rows() {
        // February 2021 begins on a Monday with 28 days.
        let feb = month(2021, 2);
        assert_eq!(feb.days_in_month(), 28);
        assert_eq!(feb.week_count(), 4);
    }

    #[test]
    fn century_leap_rules() {
        assert_eq!(month(1900, 2).days_in_month(), 28);
        assert_eq!(month(2000, 2).days_in_month(), 29);
    }

    #[test]
    fn month_length_agrees_with_chrono() {
        for year in [1600, 1700, 2023, 2024] {
            for m in 1..=12 {
                let days = month(year, m).days_in_month();
                assert!(NaiveDate::from_ymd_opt(year, m, days).is_some());
                assert!(NaiveDate::from_ymd_opt(year, m, days + 1).is_none());
            }
        }
        let last = CalendarMonth::new(NaiveDate::MAX.year(), 12).unwrap();
        assert_eq!(last.last_day(), NaiveDate::MAX);
    }

    #[test]
    fn coordinate_of_rejects_days_outside_the_month() {
        let apr = month(2024, 4);
        assert!(matches!(apr.coordinate_of(0), Err(LayoutError::OutOfRange { .. })));
        assert!(matches!(apr.coordinate_of(31), Err(LayoutError::OutOfRange { .. })));
        assert!(apr.coordinate_of(30).is_ok());
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(CalendarMonth::new(2024, 0).is_err());
        assert!(CalendarMonth::new(2024, 13).is_err());
        assert!(weekday_offset(2024, 13).is_err());
    }

    #[test]
    fn grid_properties_hold_across_years() {
        for year in [1583, 1899, 1970, 2023, 2024, 2100, 9999] {
            for m in 1..=12 {
                let cm = month(year, m);
                let offset = cm.weekday_offset();
                let days = cm.days_in_month();
                let weeks = cm.week_count();

                assert!(weeks * 7 >= offset + days);
                assert!((weeks - 1) * 7 < offset + days);

                let mut filled = 0;
                for week in 0..weeks {
                    for column in 0..7 {
                        if let Some(day) = cm.day_of_month_at(week, column) {
                            filled += 1;
                            assert_eq!(cm.coordinate_of(day).unwrap(), DayCoordinate { week, column });
                        }
                    }
                }
                assert_eq!(filled, days, "{cm}");

                for day in 1..=days {
                    let c = cm.coordinate_of(day).unwrap();
                    assert_eq!(c.week * 7 + c.column - offset + 1, day);
                    assert_eq!(cm.day_of_month_at(c.week, c.column), Some(day));
                }
            }
        }
    }

    #[test]
    fn weekday_offset_matches_chrono() {
        let cm = month(1969, 7);
        let expected = NaiveDate::from_ymd_opt(1969, 7, 1)
            .unwrap()
            .weekday()
            .num_days_from_monday();
        assert_eq!(cm.weekday_offset(), expected);
    }

    #[test]
    fn navigation_rolls_over_years() {
        let dec = month(2023, 12);
        assert_eq!(dec.succ(), Some(month(2024, 1)));
        assert_eq!(month(2024, 1).pred(), Some(dec));
        assert_eq!(month(2024, 6).succ(), Some(month(2024, 7)));
    }

    #[test]
    fn containing_and_title() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 17).unwrap();
        let cm = CalendarMonth::containing(date);
        assert_eq!(cm, month(2024, 2));
        assert!(cm.contains(date));
        assert_eq!(cm.title(), "February 2024");
        assert_eq!(cm.to_string(), "2024-02");
    }
}
