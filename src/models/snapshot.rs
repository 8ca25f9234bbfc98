//! Schedule snapshot.
//!
//! A read snapshot of the external store: people, phases, and assignments
//! fetched for one render cycle. The coordinator owns it; layout
//! algorithms receive read-only slices.
//!
//! The mutation helpers exist only for what-if scratch copies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Assignment, Person, Phase};

/// People, phases, and assignments as last fetched from the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    /// Grid rows, in display order.
    pub people: Vec<Person>,
    /// Phases of all loaded projects.
    pub phases: Vec<Phase>,
    /// Assignments (phase and legacy task).
    pub assignments: Vec<Assignment>,
}

impl ScheduleSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot from fetched parts.
    pub fn from_parts(
        people: Vec<Person>,
        phases: Vec<Phase>,
        assignments: Vec<Assignment>,
    ) -> Self {
        Self {
            people,
            phases,
            assignments,
        }
    }

    /// Finds a person by ID.
    pub fn person(&self, person_id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == person_id)
    }

    /// Row index of a person.
    pub fn person_index(&self, person_id: &str) -> Option<usize> {
        self.people.iter().position(|p| p.id == person_id)
    }

    /// Finds a phase by ID.
    pub fn phase(&self, phase_id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    /// Finds an assignment by ID.
    pub fn assignment(&self, assignment_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == assignment_id)
    }

    /// Returns all assignments for a person, in snapshot order.
    pub fn assignments_for_person(&self, person_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.person_id == person_id)
            .collect()
    }

    /// Returns all assignments for a phase.
    pub fn assignments_for_phase(&self, phase_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.phase_id.as_deref() == Some(phase_id))
            .collect()
    }

    /// Returns a person's assignments intersecting `[from, to)`.
    pub fn visible_assignments(
        &self,
        person_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.person_id == person_id && a.overlaps_range(from, to))
            .collect()
    }

    /// Remaining effort of a phase (`None` if unknown).
    pub fn remaining_days(&self, phase_id: &str) -> Option<u32> {
        self.phase(phase_id)
            .map(|ph| ph.remaining_days(&self.assignments))
    }

    /// Phases without any assignment, in snapshot order.
    pub fn unscheduled_phases(&self) -> Vec<&Phase> {
        self.phases
            .iter()
            .filter(|ph| ph.is_unscheduled(&self.assignments))
            .collect()
    }

    /// Latest exclusive end date of a phase's assignments.
    pub fn phase_end(&self, phase_id: &str) -> Option<NaiveDate> {
        self.assignments_for_phase(phase_id)
            .iter()
            .map(|a| a.end_exclusive())
            .max()
    }

    /// Assigned days per person (all time).
    pub fn assigned_days_by_person(&self) -> HashMap<String, u32> {
        let mut totals: HashMap<String, u32> = HashMap::new();
        for a in &self.assignments {
            *totals.entry(a.person_id.clone()).or_insert(0) += a.assigned_days;
        }
        totals
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Adds an assignment.
    pub fn insert_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Mutable access to an assignment.
    pub fn assignment_mut(&mut self, assignment_id: &str) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| a.id == assignment_id)
    }

    /// Removes an assignment, returning it if present.
    pub fn remove_assignment(&mut self, assignment_id: &str) -> Option<Assignment> {
        let idx = self.assignments.iter().position(|a| a.id == assignment_id)?;
        Some(self.assignments.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_snapshot() -> ScheduleSnapshot {
        ScheduleSnapshot::from_parts(
            vec![Person::new("p1"), Person::new("p2")],
            vec![
                Phase::new("ph1", "proj").with_estimate(10),
                Phase::new("ph2", "proj").with_estimate(4),
                Phase::new("ph3", "proj").with_estimate(2),
            ],
            vec![
                Assignment::new("a1", "ph1", "p1", d(2025, 1, 6), 5),
                Assignment::new("a2", "ph1", "p2", d(2025, 1, 13), 3),
                Assignment::new("a3", "ph2", "p1", d(2025, 2, 3), 4),
                Assignment::legacy_task("t1", "p2", d(2025, 1, 6), 2),
            ],
        )
    }

    #[test]
    fn test_lookups() {
        let s = sample_snapshot();
        assert_eq!(s.person_index("p2"), Some(1));
        assert!(s.person("p9").is_none());
        assert_eq!(s.phase("ph2").map(|p| p.estimated_days), Some(4));
        assert_eq!(s.assignment("a3").map(|a| a.person_id.as_str()), Some("p1"));
    }

    #[test]
    fn test_assignments_for_person_and_phase() {
        let s = sample_snapshot();
        assert_eq!(s.assignments_for_person("p1").len(), 2);
        assert_eq!(s.assignments_for_person("p2").len(), 2);
        assert_eq!(s.assignments_for_phase("ph1").len(), 2);
        assert_eq!(s.assignments_for_phase("ph3").len(), 0);
    }

    #[test]
    fn test_visible_assignments() {
        let s = sample_snapshot();
        let jan = s.visible_assignments("p1", d(2025, 1, 1), d(2025, 2, 1));
        assert_eq!(jan.len(), 1);
        assert_eq!(jan[0].id, "a1");
    }

    #[test]
    fn test_remaining_and_unscheduled() {
        let s = sample_snapshot();
        assert_eq!(s.remaining_days("ph1"), Some(2));
        assert_eq!(s.remaining_days("ph2"), Some(0));
        assert_eq!(s.remaining_days("nope"), None);
        let unscheduled: Vec<&str> = s.unscheduled_phases().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(unscheduled, vec!["ph3"]);
    }

    #[test]
    fn test_phase_end() {
        let s = sample_snapshot();
        assert_eq!(s.phase_end("ph1"), Some(d(2025, 1, 16)));
        assert_eq!(s.phase_end("ph3"), None);
    }

    #[test]
    fn test_assigned_days_by_person() {
        let s = sample_snapshot();
        let totals = s.assigned_days_by_person();
        assert_eq!(totals["p1"], 9);
        assert_eq!(totals["p2"], 5);
    }

    #[test]
    fn test_scratch_mutations() {
        let mut s = sample_snapshot();
        s.insert_assignment(Assignment::new("a9", "ph3", "p1", d(2025, 3, 3), 2));
        assert_eq!(s.assignment_count(), 5);

        if let Some(a) = s.assignment_mut("a9") {
            a.person_id = "p2".into();
        }
        assert_eq!(s.assignment("a9").map(|a| a.person_id.as_str()), Some("p2"));

        let removed = s.remove_assignment("a9");
        assert!(removed.is_some());
        assert!(s.remove_assignment("a9").is_none());
        assert_eq!(s.assignment_count(), 4);
    }
}
