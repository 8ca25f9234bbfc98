//! Calendar segmentation.
//!
//! Maps a date range and zoom level to the ordered time columns of the grid
//! plus the month header groups spanning them.
//!
//! # Alignment
//! - `Day`: one column per day in `[from, to)`.
//! - `Week` / `Biweek`: 7- or 14-day columns starting on the Monday
//!   on/before `from`, continuing while the column start is before `to`.
//!
//! The result is a pure function of `(from, to, zoom)`.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::add_days;

/// Calendar granularity of one grid column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zoom {
    /// One day per column.
    #[default]
    Day,
    /// One Monday-aligned week per column.
    Week,
    /// Two Monday-aligned weeks per column.
    Biweek,
}

impl Zoom {
    /// Calendar days covered by one column.
    pub fn days_per_column(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Biweek => 14,
        }
    }

    /// Working days represented by one column (used for span widths).
    pub fn workdays_per_column(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 5,
            Self::Biweek => 10,
        }
    }
}

/// One renderable time column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// First day of the column.
    pub start: NaiveDate,
    /// Last day of the column (inclusive).
    pub end: NaiveDate,
    /// Header label.
    pub label: String,
    /// Column starts a week (Monday in day zoom; always true otherwise).
    pub week_start: bool,
    /// First column of its (year, month).
    pub month_start: bool,
}

impl Column {
    /// Number of calendar days covered.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether a day falls inside the column.
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// Consecutive columns sharing a (year, month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGroup {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Header label (e.g. "January 2025").
    pub label: String,
    /// Index of the first column in the group.
    pub first_column: usize,
    /// Number of columns in the group.
    pub span: usize,
}

/// Columns and month groups for a viewport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Zoom the columns were built for.
    pub zoom: Zoom,
    /// Ordered columns.
    pub columns: Vec<Column>,
    /// Month header groups, in column order.
    pub month_groups: Vec<MonthGroup>,
}

impl Segmentation {
    /// Whether there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First day covered by the columns.
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.columns.first().map(|c| c.start)
    }

    /// Day after the last covered day.
    pub fn end_exclusive(&self) -> Option<NaiveDate> {
        self.columns.last().map(|c| add_days(c.end, 1))
    }

    /// Index of the column containing a day.
    pub fn column_for_date(&self, day: NaiveDate) -> Option<usize> {
        let first = self.first_day()?;
        if day < first {
            return None;
        }
        let idx = (day - first).num_days() / i64::from(self.zoom.days_per_column());
        usize::try_from(idx)
            .ok()
            .filter(|&i| i < self.columns.len())
    }

    /// Fractional column offset of a day relative to the first column.
    ///
    /// Negative for days before the first column.
    pub fn column_offset(&self, day: NaiveDate) -> f64 {
        match self.first_day() {
            Some(first) => {
                (day - first).num_days() as f64 / f64::from(self.zoom.days_per_column())
            }
            None => 0.0,
        }
    }
}

/// Builds the columns and month groups for `[from, to)` at a zoom level.
///
/// Returns an empty segmentation when `from >= to`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_plangrid::timeline::{segment, Zoom};
///
/// let from = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// let to = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
/// let seg = segment(from, to, Zoom::Week);
/// assert_eq!(seg.columns.len(), 4);
/// ```
pub fn segment(from: NaiveDate, to: NaiveDate, zoom: Zoom) -> Segmentation {
    if from >= to {
        return Segmentation {
            zoom,
            ..Default::default()
        };
    }

    let step = i64::from(zoom.days_per_column());
    let mut start = match zoom {
        Zoom::Day => from,
        Zoom::Week | Zoom::Biweek => monday_on_or_before(from),
    };

    let mut columns: Vec<Column> = Vec::new();
    while start < to {
        let end = add_days(start, step - 1);
        let month_start = columns
            .last()
            .map_or(true, |prev| !same_month(prev.start, start));
        columns.push(Column {
            start,
            end,
            label: column_label(start, zoom),
            week_start: zoom != Zoom::Day || start.weekday() == Weekday::Mon,
            month_start,
        });
        let next = add_days(start, step);
        if next == start {
            break; // calendar upper bound
        }
        start = next;
    }

    let month_groups = group_months(&columns);
    Segmentation {
        zoom,
        columns,
        month_groups,
    }
}

/// Merges consecutive columns sharing a (year, month) of their start day.
pub fn group_months(columns: &[Column]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    for (idx, col) in columns.iter().enumerate() {
        match groups.last_mut() {
            Some(g) if g.year == col.start.year() && g.month == col.start.month() => {
                g.span += 1;
            }
            _ => groups.push(MonthGroup {
                year: col.start.year(),
                month: col.start.month(),
                label: col.start.format("%B %Y").to_string(),
                first_column: idx,
                span: 1,
            }),
        }
    }
    groups
}

fn monday_on_or_before(day: NaiveDate) -> NaiveDate {
    add_days(day, -i64::from(day.weekday().num_days_from_monday()))
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn column_label(start: NaiveDate, zoom: Zoom) -> String {
    match zoom {
        Zoom::Day => start.format("%a %d").to_string(),
        Zoom::Week => format!("W{:02}", start.iso_week().week()),
        Zoom::Biweek => start.format("%d %b").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_zoom_columns() {
        let seg = segment(d(2025, 1, 6), d(2025, 2, 3), Zoom::Week);
        assert_eq!(seg.columns.len(), 4);
        assert_eq!(seg.columns[0].start, d(2025, 1, 6));
        assert!(seg.columns.iter().all(|c| c.span_days() == 7));
        assert!(seg.columns.iter().all(|c| c.week_start));
        assert_eq!(seg.columns[0].label, "W02");
    }

    #[test]
    fn test_day_zoom_month_groups() {
        let seg = segment(d(2025, 1, 6), d(2025, 2, 3), Zoom::Day);
        assert_eq!(seg.columns.len(), 28);
        assert_eq!(seg.month_groups.len(), 2);
        assert_eq!(seg.month_groups[0].span, 26);
        assert_eq!(seg.month_groups[0].label, "January 2025");
        assert_eq!(seg.month_groups[1].span, 2);
        assert_eq!(seg.month_groups[1].first_column, 26);
        assert!(seg.columns[26].month_start);
        assert!(!seg.columns[25].month_start);
    }

    #[test]
    fn test_day_zoom_week_boundaries() {
        let seg = segment(d(2025, 1, 6), d(2025, 1, 20), Zoom::Day);
        let mondays: Vec<usize> = seg
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.week_start)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(mondays, vec![0, 7]);
        assert_eq!(seg.columns[0].label, "Mon 06");
    }

    #[test]
    fn test_week_alignment_mid_week() {
        // 2025-01-09 is a Thursday → first column starts Monday 2025-01-06
        let seg = segment(d(2025, 1, 9), d(2025, 1, 20), Zoom::Week);
        assert_eq!(seg.columns[0].start, d(2025, 1, 6));
        assert_eq!(seg.columns.len(), 2);
    }

    #[test]
    fn test_biweek_zoom() {
        let seg = segment(d(2025, 1, 8), d(2025, 3, 1), Zoom::Biweek);
        assert_eq!(seg.columns[0].start, d(2025, 1, 6));
        assert!(seg.columns.iter().all(|c| c.span_days() == 14));
        // 01-06, 01-20, 02-03, 02-17
        assert_eq!(seg.columns.len(), 4);
        assert_eq!(seg.columns[0].label, "06 Jan");
        assert_eq!(seg.month_groups.len(), 2);
        assert_eq!(seg.month_groups[0].span, 2);
        assert_eq!(seg.month_groups[1].span, 2);
    }

    #[test]
    fn test_empty_range() {
        let seg = segment(d(2025, 2, 1), d(2025, 2, 1), Zoom::Day);
        assert!(seg.is_empty());
        assert!(seg.month_groups.is_empty());

        let reversed = segment(d(2025, 3, 1), d(2025, 2, 1), Zoom::Week);
        assert!(reversed.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let a = segment(d(2024, 12, 20), d(2025, 1, 20), Zoom::Day);
        let b = segment(d(2024, 12, 20), d(2025, 1, 20), Zoom::Day);
        assert_eq!(a, b);
        // Year boundary produces separate groups
        assert_eq!(a.month_groups[0].year, 2024);
        assert_eq!(a.month_groups[1].year, 2025);
    }

    #[test]
    fn test_column_lookup() {
        let seg = segment(d(2025, 1, 6), d(2025, 2, 3), Zoom::Week);
        assert_eq!(seg.column_for_date(d(2025, 1, 6)), Some(0));
        assert_eq!(seg.column_for_date(d(2025, 1, 19)), Some(1));
        assert_eq!(seg.column_for_date(d(2025, 2, 2)), Some(3));
        assert_eq!(seg.column_for_date(d(2025, 2, 3)), None);
        assert_eq!(seg.column_for_date(d(2025, 1, 1)), None);
        assert!((seg.column_offset(d(2025, 1, 9)) - 3.0 / 7.0).abs() < 1e-10);
        assert_eq!(seg.end_exclusive(), Some(d(2025, 2, 3)));
    }
}
