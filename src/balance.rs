//! Auto-balance heuristic.
//!
//! Proposes placements for unscheduled phases. Greedy and
//! priority-driven; not an optimizer.
//!
//! # Algorithm
//!
//! 1. Collect open (not Done/Canceled) phases with no assignment and a
//!    positive estimate.
//! 2. Sort by priority, descending (stable: ties keep snapshot order).
//! 3. For each phase, compute its earliest start: the balance start date,
//!    pushed past the end of its dependency (assigned or proposed).
//! 4. Pick the person whose next working day at/after
//!    `max(earliest, person free date)` comes first; ties go to the person
//!    listed first.
//! 5. Book the phase's full estimate there and advance that person's free date.
//!
//! # Complexity
//! O(n · p) where n = phases, p = people (plus calendar look-ahead).
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{add_days, Phase, ScheduleSnapshot, WorkCalendar};

/// A proposed new assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Phase to schedule.
    pub phase_id: String,
    /// Chosen person.
    pub person_id: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Days to book.
    pub assigned_days: u32,
}

impl Placement {
    /// First day after the placement.
    pub fn end_exclusive(&self) -> NaiveDate {
        add_days(self.start_date, i64::from(self.assigned_days))
    }
}

/// Greedy earliest-available-person balancer.
#[derive(Debug, Clone)]
pub struct AutoBalancer<'a> {
    calendar: &'a WorkCalendar,
    start_date: NaiveDate,
}

impl<'a> AutoBalancer<'a> {
    /// Creates a balancer placing nothing before `start_date`.
    pub fn new(calendar: &'a WorkCalendar, start_date: NaiveDate) -> Self {
        Self {
            calendar,
            start_date,
        }
    }

    /// Proposes placements for the snapshot's unscheduled phases.
    ///
    /// Never mutates the snapshot.
    pub fn propose(&self, snapshot: &ScheduleSnapshot) -> Vec<Placement> {
        let mut free_from: HashMap<&str, NaiveDate> = HashMap::new();
        for person in &snapshot.people {
            let busy_until = snapshot
                .assignments_for_person(&person.id)
                .iter()
                .map(|a| a.end_exclusive())
                .max()
                .unwrap_or(self.start_date);
            free_from.insert(person.id.as_str(), busy_until.max(self.start_date));
        }

        let order = self.sort_phases(snapshot);
        let mut proposed_end: HashMap<&str, NaiveDate> = HashMap::new();
        let mut placements = Vec::new();

        for phase in order {
            let earliest = self.earliest_start(phase, snapshot, &proposed_end);

            let mut best: Option<(&str, NaiveDate)> = None;
            for person in &snapshot.people {
                if person.weekly_hours <= 0.0 {
                    continue;
                }
                let free = free_from
                    .get(person.id.as_str())
                    .copied()
                    .unwrap_or(self.start_date);
                let Some(start) = self
                    .calendar
                    .next_working_day(&person.id, free.max(earliest))
                else {
                    continue;
                };
                if best.map_or(true, |(_, best_start)| start < best_start) {
                    best = Some((person.id.as_str(), start));
                }
            }

            let Some((person_id, start_date)) = best else {
                debug!(phase = %phase.id, "no available person for phase");
                continue;
            };

            let placement = Placement {
                phase_id: phase.id.clone(),
                person_id: person_id.to_string(),
                start_date,
                assigned_days: phase.estimated_days,
            };
            free_from.insert(person_id, placement.end_exclusive());
            proposed_end.insert(phase.id.as_str(), placement.end_exclusive());
            placements.push(placement);
        }

        placements
    }

    fn sort_phases<'s>(&self, snapshot: &'s ScheduleSnapshot) -> Vec<&'s Phase> {
        let mut phases: Vec<&Phase> = snapshot
            .phases
            .iter()
            .filter(|ph| {
                ph.status.is_open()
                    && ph.estimated_days > 0
                    && ph.is_unscheduled(&snapshot.assignments)
            })
            .collect();
        phases.sort_by(|a, b| b.priority.cmp(&a.priority));
        phases
    }

    fn earliest_start(
        &self,
        phase: &Phase,
        snapshot: &ScheduleSnapshot,
        proposed_end: &HashMap<&str, NaiveDate>,
    ) -> NaiveDate {
        let Some(dep) = phase.depends_on.as_deref() else {
            return self.start_date;
        };
        let assigned = snapshot.phase_end(dep);
        let proposed = proposed_end.get(dep).copied();
        assigned
            .into_iter()
            .chain(proposed)
            .max()
            .map_or(self.start_date, |end| end.max(self.start_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, LeaveRange, Person, PhaseStatus};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // 2025-01-06 is a Monday
    fn monday() -> NaiveDate {
        d(2025, 1, 6)
    }

    #[test]
    fn test_priority_ordering() {
        let snapshot = ScheduleSnapshot::from_parts(
            vec![Person::new("p1")],
            vec![
                Phase::new("low", "proj").with_estimate(2).with_priority(1),
                Phase::new("high", "proj").with_estimate(3).with_priority(10),
            ],
            vec![],
        );
        let cal = WorkCalendar::new();
        let placements = AutoBalancer::new(&cal, monday()).propose(&snapshot);

        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].phase_id, "high");
        assert_eq!(placements[0].start_date, monday());
        assert_eq!(placements[1].phase_id, "low");
        assert_eq!(placements[1].start_date, d(2025, 1, 9));
    }

    #[test]
    fn test_spreads_across_people() {
        let snapshot = ScheduleSnapshot::from_parts(
            vec![Person::new("p1"), Person::new("p2")],
            vec![
                Phase::new("a", "proj").with_estimate(4),
                Phase::new("b", "proj").with_estimate(4),
            ],
            vec![],
        );
        let cal = WorkCalendar::new();
        let placements = AutoBalancer::new(&cal, monday()).propose(&snapshot);
        assert_eq!(placements[0].person_id, "p1");
        assert_eq!(placements[1].person_id, "p2");
        assert_eq!(placements[1].start_date, monday());
    }

    #[test]
    fn test_respects_existing_bookings_and_leave() {
        let snapshot = ScheduleSnapshot::from_parts(
            vec![Person::new("p1"), Person::new("p2")],
            vec![
                Phase::new("busy", "proj").with_estimate(3),
                Phase::new("new", "proj").with_estimate(2),
            ],
            vec![Assignment::new("a1", "busy", "p1", monday(), 3)],
        );
        let cal = WorkCalendar::new().with_leave("p2", LeaveRange::new(monday(), d(2025, 1, 7)));
        let placements = AutoBalancer::new(&cal, monday()).propose(&snapshot);

        // p1 free on Thu 9th, p2 back on Wed 8th
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].person_id, "p2");
        assert_eq!(placements[0].start_date, d(2025, 1, 8));
    }

    #[test]
    fn test_skips_weekends() {
        let snapshot = ScheduleSnapshot::from_parts(
            vec![Person::new("p1")],
            vec![Phase::new("a", "proj").with_estimate(1)],
            vec![],
        );
        let cal = WorkCalendar::new();
        let placements = AutoBalancer::new(&cal, d(2025, 1, 4)).propose(&snapshot);
        assert_eq!(placements[0].start_date, monday());
    }

    #[test]
    fn test_dependency_pushes_start() {
        let snapshot = ScheduleSnapshot::from_parts(
            vec![Person::new("p1"), Person::new("p2")],
            vec![
                Phase::new("first", "proj").with_estimate(3).with_priority(5),
                Phase::new("second", "proj").with_estimate(2).with_dependency("first"),
            ],
            vec![],
        );
        let cal = WorkCalendar::new();
        let placements = AutoBalancer::new(&cal, monday()).propose(&snapshot);
        let second = placements.iter().find(|p| p.phase_id == "second").unwrap();
        // p2 is free but must wait for "first" to end on the 9th
        assert_eq!(second.person_id, "p2");
        assert_eq!(second.start_date, d(2025, 1, 9));
    }

    #[test]
    fn test_skips_closed_and_zero_capacity() {
        let snapshot = ScheduleSnapshot::from_parts(
            vec![Person::new("off").with_weekly_hours(0.0), Person::new("p1")],
            vec![
                Phase::new("done", "proj").with_estimate(2).with_status(PhaseStatus::Done),
                Phase::new("empty", "proj"),
                Phase::new("open", "proj").with_estimate(2),
            ],
            vec![],
        );
        let cal = WorkCalendar::new();
        let placements = AutoBalancer::new(&cal, monday()).propose(&snapshot);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].phase_id, "open");
        assert_eq!(placements[0].person_id, "p1");
    }
}
