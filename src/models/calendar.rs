//! Work calendar: weekends, company holidays, and personal leave.
//!
//! Classifies a (person, day) pair as workable or not. The calendar is a
//! plain configuration value; it holds no mutable state and performs no I/O.
//!
//! # Precedence
//! A day is non-working iff it is a weekend day, OR a company holiday,
//! OR inside any of the person's leave ranges. All three flags are
//! reported independently.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::assignment::add_days;

/// Upper bound on the forward search in [`WorkCalendar::next_working_day`].
const MAX_WORKDAY_SEARCH_DAYS: i64 = 366;

/// An inclusive date range `[start, end]` of leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRange {
    /// First day of leave (inclusive).
    pub start: NaiveDate,
    /// Last day of leave (inclusive).
    pub end: NaiveDate,
}

impl LeaveRange {
    /// Creates a leave range. Reversed bounds are swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// A single day of leave.
    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Whether a day falls within the range (both ends inclusive).
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// Classification of a single (person, day) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    /// The weekday is in the weekend set.
    pub weekend: bool,
    /// The day is a company holiday.
    pub holiday: bool,
    /// The person is on leave.
    pub on_leave: bool,
    /// `weekend || holiday || on_leave`.
    pub non_work: bool,
}

/// Company-wide and per-person non-working day configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkCalendar {
    /// Weekdays treated as weekend.
    pub weekend: Vec<Weekday>,
    /// Company holidays.
    pub holidays: Vec<NaiveDate>,
    /// Leave ranges per person ID.
    pub leaves: HashMap<String, Vec<LeaveRange>>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Sat, Weekday::Sun],
            holidays: Vec::new(),
            leaves: HashMap::new(),
        }
    }
}

impl WorkCalendar {
    /// Creates a calendar with a Saturday/Sunday weekend and no holidays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the weekend set.
    pub fn with_weekend(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekend = days.into_iter().collect();
        self
    }

    /// Adds a company holiday.
    pub fn with_holiday(mut self, day: NaiveDate) -> Self {
        self.holidays.push(day);
        self
    }

    /// Adds a leave range for a person.
    pub fn with_leave(mut self, person_id: impl Into<String>, range: LeaveRange) -> Self {
        self.leaves.entry(person_id.into()).or_default().push(range);
        self
    }

    /// Classifies a day for a person.
    pub fn day_status(&self, person_id: &str, day: NaiveDate) -> DayStatus {
        let weekend = self.weekend.contains(&day.weekday());
        let holiday = self.holidays.contains(&day);
        let on_leave = self
            .leaves
            .get(person_id)
            .is_some_and(|ranges| ranges.iter().any(|r| r.contains(day)));

        DayStatus {
            weekend,
            holiday,
            on_leave,
            non_work: weekend || holiday || on_leave,
        }
    }

    /// Whether the person can work on the given day.
    pub fn is_working_day(&self, person_id: &str, day: NaiveDate) -> bool {
        !self.day_status(person_id, day).non_work
    }

    /// Finds the first working day at or after `from`.
    ///
    /// Returns `None` if no working day exists within a year (e.g. a
    /// seven-day weekend or an open-ended leave).
    pub fn next_working_day(&self, person_id: &str, from: NaiveDate) -> Option<NaiveDate> {
        (0..MAX_WORKDAY_SEARCH_DAYS)
            .map(|offset| add_days(from, offset))
            .find(|&day| self.is_working_day(person_id, day))
    }

    /// Counts working days in the half-open range `[from, to)`.
    pub fn working_days_in_range(&self, person_id: &str, from: NaiveDate, to: NaiveDate) -> u32 {
        if to <= from {
            return 0;
        }
        from.iter_days()
            .take_while(|&day| day < to)
            .filter(|&day| self.is_working_day(person_id, day))
            .count() as u32
    }
}

/// Classifies a day for a person against the given calendar.
pub fn day_status(person_id: &str, day: NaiveDate, calendar: &WorkCalendar) -> DayStatus {
    calendar.day_status(person_id, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekend_default() {
        let cal = WorkCalendar::new();
        // 2025-08-30 is a Saturday
        let sat = cal.day_status("p1", d(2025, 8, 30));
        assert!(sat.weekend);
        assert!(sat.non_work);

        let mon = cal.day_status("p1", d(2025, 9, 1));
        assert!(!mon.weekend);
        assert!(!mon.non_work);
    }

    #[test]
    fn test_custom_weekend() {
        let cal = WorkCalendar::new().with_weekend([Weekday::Fri, Weekday::Sat]);
        assert!(cal.day_status("p1", d(2025, 8, 29)).weekend); // Friday
        assert!(!cal.day_status("p1", d(2025, 8, 31)).weekend); // Sunday
    }

    #[test]
    fn test_holiday() {
        let cal = WorkCalendar::new().with_holiday(d(2025, 12, 25));
        let status = cal.day_status("anyone", d(2025, 12, 25));
        assert!(status.holiday);
        assert!(status.non_work);
        assert!(!cal.day_status("anyone", d(2025, 12, 24)).holiday);
    }

    #[test]
    fn test_single_day_leave() {
        let cal = WorkCalendar::new().with_leave("p1", LeaveRange::single(d(2025, 8, 27)));

        let on = day_status("p1", d(2025, 8, 27), &cal);
        assert!(on.on_leave);
        assert!(on.non_work);

        assert!(!day_status("p1", d(2025, 8, 26), &cal).on_leave);
        assert!(!day_status("p1", d(2025, 8, 28), &cal).on_leave);
        // Other people are unaffected
        assert!(!day_status("p2", d(2025, 8, 27), &cal).on_leave);
    }

    #[test]
    fn test_leave_range_inclusive_and_swapped() {
        let r = LeaveRange::new(d(2025, 3, 10), d(2025, 3, 5));
        assert_eq!(r.start, d(2025, 3, 5));
        assert!(r.contains(d(2025, 3, 5)));
        assert!(r.contains(d(2025, 3, 10)));
        assert!(!r.contains(d(2025, 3, 11)));
    }

    #[test]
    fn test_next_working_day() {
        let cal = WorkCalendar::new()
            .with_holiday(d(2025, 9, 1))
            .with_leave("p1", LeaveRange::new(d(2025, 9, 2), d(2025, 9, 3)));

        // Saturday → skips weekend, Monday holiday, Tue-Wed leave
        assert_eq!(cal.next_working_day("p1", d(2025, 8, 30)), Some(d(2025, 9, 4)));
        assert_eq!(cal.next_working_day("p2", d(2025, 8, 30)), Some(d(2025, 9, 2)));
        assert_eq!(cal.next_working_day("p1", d(2025, 9, 4)), Some(d(2025, 9, 4)));
    }

    #[test]
    fn test_next_working_day_none() {
        let cal = WorkCalendar::new().with_weekend([
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]);
        assert_eq!(cal.next_working_day("p1", d(2025, 1, 1)), None);
    }

    #[test]
    fn test_working_days_in_range() {
        let cal = WorkCalendar::new().with_holiday(d(2025, 1, 1));
        // 2025-01-01 (Wed) .. 2025-01-08 (Wed) exclusive: Wed(hol) Thu Fri Sat Sun Mon Tue
        assert_eq!(cal.working_days_in_range("p1", d(2025, 1, 1), d(2025, 1, 8)), 4);
        assert_eq!(cal.working_days_in_range("p1", d(2025, 1, 8), d(2025, 1, 1)), 0);
    }
}
