//! Phase model.
//!
//! A phase is a unit of plannable work belonging to a project. It carries
//! an effort estimate in days and becomes "scheduled" once assignments
//! reference it.
//!
//! # Scheduling State
//! - **Unscheduled**: no assignment references the phase.
//! - **Partially scheduled**: Σ assigned days < estimated days.
//! - **Fully scheduled**: remaining = max(0, estimated − Σ assigned) = 0.

use serde::{Deserialize, Serialize};

use super::Assignment;

/// Lifecycle status of a phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseStatus {
    /// Not started yet.
    #[default]
    Planned,
    /// Work is underway.
    InProgress,
    /// Waiting on something outside the plan.
    Blocked,
    /// Finished.
    Done,
    /// Abandoned.
    Canceled,
}

impl PhaseStatus {
    /// Whether the phase still needs scheduling attention.
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Done | Self::Canceled)
    }
}

/// A schedulable unit of project work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique phase identifier.
    pub id: String,
    /// Owning project identifier.
    pub project_id: String,
    /// Display title.
    pub title: String,
    /// Estimated effort (days).
    pub estimated_days: u32,
    /// Phase that must finish before this one starts.
    pub depends_on: Option<String>,
    /// Scheduling priority (higher = more important).
    pub priority: i32,
    /// Lifecycle status.
    pub status: PhaseStatus,
}

impl Phase {
    /// Creates a planned phase with no estimate.
    pub fn new(id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: String::new(),
            estimated_days: 0,
            depends_on: None,
            priority: 0,
            status: PhaseStatus::Planned,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the effort estimate (days).
    pub fn with_estimate(mut self, days: u32) -> Self {
        self.estimated_days = days;
        self
    }

    /// Sets the phase this one depends on.
    pub fn with_dependency(mut self, phase_id: impl Into<String>) -> Self {
        self.depends_on = Some(phase_id.into());
        self
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: PhaseStatus) -> Self {
        self.status = status;
        self
    }

    /// Sum of assigned days across the assignments that reference this phase.
    ///
    /// Assignments for other phases are ignored, so the full snapshot
    /// list can be passed.
    pub fn assigned_days<'a>(&self, assignments: impl IntoIterator<Item = &'a Assignment>) -> u32 {
        assignments
            .into_iter()
            .filter(|a| a.phase_id.as_deref() == Some(self.id.as_str()))
            .map(|a| a.assigned_days)
            .sum()
    }

    /// Remaining effort: `max(0, estimated − Σ assigned)`.
    pub fn remaining_days<'a>(&self, assignments: impl IntoIterator<Item = &'a Assignment>) -> u32 {
        self.estimated_days
            .saturating_sub(self.assigned_days(assignments))
    }

    /// Whether no assignment references this phase.
    pub fn is_unscheduled<'a>(
        &self,
        assignments: impl IntoIterator<Item = &'a Assignment>,
    ) -> bool {
        !assignments
            .into_iter()
            .any(|a| a.phase_id.as_deref() == Some(self.id.as_str()))
    }

    /// Whether the assigned days cover the estimate.
    pub fn is_fully_scheduled<'a>(
        &self,
        assignments: impl IntoIterator<Item = &'a Assignment> + Clone,
    ) -> bool {
        !self.is_unscheduled(assignments.clone()) && self.remaining_days(assignments) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_phase_builder() {
        let ph = Phase::new("ph1", "proj")
            .with_title("Design")
            .with_estimate(10)
            .with_dependency("ph0")
            .with_priority(3)
            .with_status(PhaseStatus::InProgress);

        assert_eq!(ph.id, "ph1");
        assert_eq!(ph.project_id, "proj");
        assert_eq!(ph.title, "Design");
        assert_eq!(ph.estimated_days, 10);
        assert_eq!(ph.depends_on.as_deref(), Some("ph0"));
        assert_eq!(ph.priority, 3);
        assert_eq!(ph.status, PhaseStatus::InProgress);
    }

    #[test]
    fn test_remaining_days() {
        let ph = Phase::new("ph1", "proj").with_estimate(10);
        let assignments = vec![
            Assignment::new("a1", "ph1", "p1", d(2025, 1, 1), 4),
            Assignment::new("a2", "ph1", "p2", d(2025, 1, 1), 3),
            Assignment::new("a3", "other", "p2", d(2025, 1, 1), 30),
        ];
        assert_eq!(ph.assigned_days(&assignments), 7);
        assert_eq!(ph.remaining_days(&assignments), 3);
        assert!(!ph.is_unscheduled(&assignments));
        assert!(!ph.is_fully_scheduled(&assignments));
    }

    #[test]
    fn test_remaining_floored_at_zero() {
        let ph = Phase::new("ph1", "proj").with_estimate(5);
        let assignments = vec![Assignment::new("a1", "ph1", "p1", d(2025, 1, 1), 8)];
        assert_eq!(ph.remaining_days(&assignments), 0);
        assert!(ph.is_fully_scheduled(&assignments));
    }

    #[test]
    fn test_unscheduled() {
        let ph = Phase::new("ph1", "proj").with_estimate(5);
        let none: Vec<Assignment> = Vec::new();
        assert!(ph.is_unscheduled(&none));
        assert!(!ph.is_fully_scheduled(&none));
        assert_eq!(ph.remaining_days(&none), 5);
    }

    #[test]
    fn test_status_open() {
        assert!(PhaseStatus::Planned.is_open());
        assert!(PhaseStatus::Blocked.is_open());
        assert!(!PhaseStatus::Done.is_open());
        assert!(!PhaseStatus::Canceled.is_open());
    }
}
