//! Workload indicators for the visible range.
//!
//! Computes per-person load and per-phase progress from a snapshot so the
//! host can flag over-allocation next to the grid.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Booked days | Working days covered by a person's assignments in range |
//! | Capacity days | Working days in range × weekly hours / standard week |
//! | Utilization | Booked / capacity (0 when capacity is 0) |
//! | Over-allocated | Utilization > 1, or two bookings on the same working day |
//! | Remaining | Phase estimate − assigned days (saturating) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::models::{ScheduleSnapshot, WorkCalendar};

/// Load of one person over the range.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonLoad {
    /// Person identifier.
    pub person_id: String,
    /// Working days booked (double bookings count twice).
    pub booked_days: u32,
    /// Available working days, scaled by part-time ratio.
    pub capacity_days: f64,
    /// Booked / capacity.
    pub utilization: f64,
    /// Booked beyond capacity or double-booked on some day.
    pub over_allocated: bool,
}

/// Scheduling progress of one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseProgress {
    /// Phase identifier.
    pub phase_id: String,
    /// Estimated days.
    pub estimated_days: u32,
    /// Days covered by assignments (whole snapshot).
    pub assigned_days: u32,
    /// Days still to schedule.
    pub remaining_days: u32,
}

/// Grid-level workload indicators.
#[derive(Debug, Clone)]
pub struct GridKpi {
    /// Range start (inclusive).
    pub from: NaiveDate,
    /// Range end (exclusive).
    pub to: NaiveDate,
    /// Per-person load, in snapshot order.
    pub people: Vec<PersonLoad>,
    /// Per-phase progress, in snapshot order.
    pub phases: Vec<PhaseProgress>,
    /// Open phases with no assignment.
    pub unscheduled_count: usize,
    /// Mean utilization across people with capacity.
    pub avg_utilization: f64,
}

impl GridKpi {
    /// Computes indicators over the half-open range `[from, to)`.
    ///
    /// # Arguments
    /// * `snapshot` - People, phases, and assignments.
    /// * `calendar` - Weekends, holidays, and leave.
    /// * `standard_week_hours` - Hours of a full-time week.
    pub fn calculate(
        snapshot: &ScheduleSnapshot,
        calendar: &WorkCalendar,
        from: NaiveDate,
        to: NaiveDate,
        standard_week_hours: f64,
    ) -> Self {
        let mut people = Vec::with_capacity(snapshot.people.len());

        for person in &snapshot.people {
            let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
            for a in snapshot.visible_assignments(&person.id, from, to) {
                let start = a.start_date.max(from);
                let end = a.end_exclusive().min(to);
                for day in start.iter_days().take_while(|&day| day < end) {
                    if calendar.is_working_day(&person.id, day) {
                        *per_day.entry(day).or_default() += 1;
                    }
                }
            }

            let booked_days: u32 = per_day.values().sum();
            let double_booked = per_day.values().any(|&n| n > 1);
            let working = calendar.working_days_in_range(&person.id, from, to);
            let capacity_days = f64::from(working) * person.capacity_ratio(standard_week_hours);
            let utilization = if capacity_days > 0.0 {
                f64::from(booked_days) / capacity_days
            } else {
                0.0
            };
            let over_allocated = double_booked
                || (capacity_days > 0.0 && utilization > 1.0)
                || (capacity_days <= 0.0 && booked_days > 0);

            people.push(PersonLoad {
                person_id: person.id.clone(),
                booked_days,
                capacity_days,
                utilization,
                over_allocated,
            });
        }

        let phases = snapshot
            .phases
            .iter()
            .map(|ph| {
                let assigned = ph.assigned_days(&snapshot.assignments);
                PhaseProgress {
                    phase_id: ph.id.clone(),
                    estimated_days: ph.estimated_days,
                    assigned_days: assigned,
                    remaining_days: ph.estimated_days.saturating_sub(assigned),
                }
            })
            .collect();

        let with_capacity: Vec<f64> = people
            .iter()
            .filter(|p| p.capacity_days > 0.0)
            .map(|p| p.utilization)
            .collect();
        let avg_utilization = if with_capacity.is_empty() {
            0.0
        } else {
            with_capacity.iter().sum::<f64>() / with_capacity.len() as f64
        };

        Self {
            from,
            to,
            people,
            phases,
            unscheduled_count: snapshot
                .unscheduled_phases()
                .iter()
                .filter(|ph| ph.status.is_open())
                .count(),
            avg_utilization,
        }
    }

    /// Load for one person.
    pub fn person(&self, person_id: &str) -> Option<&PersonLoad> {
        self.people.iter().find(|p| p.person_id == person_id)
    }

    /// IDs of over-allocated people.
    pub fn over_allocated(&self) -> HashSet<&str> {
        self.people
            .iter()
            .filter(|p| p.over_allocated)
            .map(|p| p.person_id.as_str())
            .collect()
    }

    /// Whether nobody is over-allocated and mean utilization reaches the floor.
    pub fn meets_thresholds(&self, min_utilization: f64) -> bool {
        self.people.iter().all(|p| !p.over_allocated) && self.avg_utilization >= min_utilization
    }
}
