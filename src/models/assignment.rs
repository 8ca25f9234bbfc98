//! Assignment model.
//!
//! An assignment binds a phase (or a legacy ad-hoc task) to one person
//! over a contiguous span of calendar days.
//!
//! # Date Model
//! `start_date` is the first day of the span. The span covers
//! `assigned_days` calendar days: `[start_date, start_date + assigned_days)`.
//! `end_date()` returns the last covered day (inclusive).

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A phase-to-person binding over a date span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique assignment identifier.
    pub id: String,
    /// Referenced phase. `None` marks a legacy ad-hoc task.
    pub phase_id: Option<String>,
    /// Assigned person.
    pub person_id: String,
    /// First day of the span.
    pub start_date: NaiveDate,
    /// Span length in days (> 0).
    pub assigned_days: u32,
    /// Assignment this one was split from, if any.
    pub parent_assignment_id: Option<String>,
}

impl Assignment {
    /// Creates a phase assignment.
    pub fn new(
        id: impl Into<String>,
        phase_id: impl Into<String>,
        person_id: impl Into<String>,
        start_date: NaiveDate,
        assigned_days: u32,
    ) -> Self {
        Self {
            id: id.into(),
            phase_id: Some(phase_id.into()),
            person_id: person_id.into(),
            start_date,
            assigned_days,
            parent_assignment_id: None,
        }
    }

    /// Creates a legacy task assignment (no phase).
    pub fn legacy_task(
        id: impl Into<String>,
        person_id: impl Into<String>,
        start_date: NaiveDate,
        assigned_days: u32,
    ) -> Self {
        Self {
            id: id.into(),
            phase_id: None,
            person_id: person_id.into(),
            start_date,
            assigned_days,
            parent_assignment_id: None,
        }
    }

    /// Sets the parent assignment reference.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_assignment_id = Some(parent_id.into());
        self
    }

    /// Whether this is a legacy task rather than a phase assignment.
    #[inline]
    pub fn is_legacy_task(&self) -> bool {
        self.phase_id.is_none()
    }

    /// First day after the span (exclusive end).
    pub fn end_exclusive(&self) -> NaiveDate {
        add_days(self.start_date, i64::from(self.assigned_days))
    }

    /// Last covered day (inclusive end).
    pub fn end_date(&self) -> NaiveDate {
        add_days(self.start_date, i64::from(self.assigned_days.max(1)) - 1)
    }

    /// Whether the span intersects the half-open date range `[from, to)`.
    pub fn overlaps_range(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date < to && self.end_exclusive() > from
    }

    /// Number of span days falling inside `[from, to)`.
    pub fn days_in_range(&self, from: NaiveDate, to: NaiveDate) -> u32 {
        let start = self.start_date.max(from);
        let end = self.end_exclusive().min(to);
        if end <= start {
            return 0;
        }
        u32::try_from((end - start).num_days()).unwrap_or(u32::MAX)
    }

    /// The lineage root used when splitting: the parent if set, else self.
    pub fn lineage_root(&self) -> &str {
        self.parent_assignment_id.as_deref().unwrap_or(&self.id)
    }
}

/// Adds a signed number of days, saturating at the calendar bounds.
pub(crate) fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}
