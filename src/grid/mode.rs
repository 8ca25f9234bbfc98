//! Live vs. what-if schedule state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::ScheduleSnapshot;

/// The snapshot the grid is showing.
///
/// `Simulated` owns a scratch copy that is mutated locally and dropped on
/// exit; only `Live` state ever reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleMode {
    /// Showing the store's snapshot.
    Live(Arc<ScheduleSnapshot>),
    /// Showing a local simulation.
    Simulated {
        /// Locally mutated copy.
        scratch: ScheduleSnapshot,
        /// Latest store snapshot, restored on exit.
        base: Arc<ScheduleSnapshot>,
    },
}

impl Default for ScheduleMode {
    fn default() -> Self {
        Self::Live(Arc::default())
    }
}

impl ScheduleMode {
    /// The snapshot currently displayed.
    pub fn snapshot(&self) -> &ScheduleSnapshot {
        match self {
            Self::Live(snapshot) => snapshot,
            Self::Simulated { scratch, .. } => scratch,
        }
    }

    /// The latest store snapshot.
    pub fn base(&self) -> &Arc<ScheduleSnapshot> {
        match self {
            Self::Live(snapshot) => snapshot,
            Self::Simulated { base, .. } => base,
        }
    }

    /// Whether what-if mode is active.
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated { .. })
    }

    /// Scratch copy, only in what-if mode.
    pub fn scratch_mut(&mut self) -> Option<&mut ScheduleSnapshot> {
        match self {
            Self::Live(_) => None,
            Self::Simulated { scratch, .. } => Some(scratch),
        }
    }

    /// Starts a simulation from the live snapshot. No-op if already simulating.
    pub fn simulate(self) -> Self {
        match self {
            Self::Live(base) => Self::Simulated {
                scratch: ScheduleSnapshot::clone(&base),
                base,
            },
            simulated => simulated,
        }
    }

    /// Drops the scratch copy and returns to the store snapshot.
    pub fn discard(self) -> Self {
        match self {
            Self::Simulated { base, .. } => Self::Live(base),
            live => live,
        }
    }

    /// Installs a freshly fetched store snapshot. The scratch copy is kept.
    pub fn replace_base(&mut self, fresh: Arc<ScheduleSnapshot>) {
        match self {
            Self::Live(snapshot) => *snapshot = fresh,
            Self::Simulated { base, .. } => *base = fresh,
        }
    }

    /// Phase ID → "has no assignment" for the displayed snapshot.
    pub(crate) fn unscheduled_by_phase(&self) -> HashMap<String, bool> {
        let snapshot = self.snapshot();
        snapshot
            .phases
            .iter()
            .map(|ph| (ph.id.clone(), ph.is_unscheduled(&snapshot.assignments)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Person, Phase};
    use chrono::NaiveDate;

    fn base() -> Arc<ScheduleSnapshot> {
        Arc::new(ScheduleSnapshot::from_parts(
            vec![Person::new("p1")],
            vec![Phase::new("ph1", "proj").with_estimate(3)],
            vec![],
        ))
    }

    #[test]
    fn test_simulate_and_discard() {
        let mut mode = ScheduleMode::Live(base()).simulate();
        assert!(mode.is_simulated());

        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        mode.scratch_mut()
            .unwrap()
            .insert_assignment(Assignment::new("sim", "ph1", "p1", start, 3));
        assert_eq!(mode.snapshot().assignment_count(), 1);
        assert_eq!(mode.base().assignment_count(), 0);

        let mode = mode.discard();
        assert!(!mode.is_simulated());
        assert_eq!(mode.snapshot().assignment_count(), 0);
    }

    #[test]
    fn test_live_has_no_scratch() {
        let mut mode = ScheduleMode::Live(base());
        assert!(mode.scratch_mut().is_none());
        assert_eq!(mode.unscheduled_by_phase().get("ph1"), Some(&true));
    }

    #[test]
    fn test_replace_base_keeps_scratch() {
        let mut mode = ScheduleMode::Live(base()).simulate();
        mode.scratch_mut().unwrap().people.push(Person::new("p2"));
        mode.replace_base(Arc::new(ScheduleSnapshot::new()));
        assert_eq!(mode.snapshot().people.len(), 2);
        assert!(mode.base().people.is_empty());
    }
}
