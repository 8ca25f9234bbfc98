//! Coordinator notifications.
//!
//! Hosts and sibling components subscribe to a [`GridCoordinator`] instead
//! of listening for named broadcast events.
//!
//! [`GridCoordinator`]: super::GridCoordinator

use chrono::NaiveDate;

use crate::store::StoreError;
use crate::timeline::Zoom;

/// Something observable changed in the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A fresh store snapshot was installed.
    SnapshotRefreshed {
        /// Number of people.
        people: usize,
        /// Number of phases.
        phases: usize,
        /// Number of assignments.
        assignments: usize,
    },
    /// A phase received its first assignment.
    PhaseScheduled {
        /// Phase identifier.
        phase_id: String,
    },
    /// A phase lost its last assignment.
    PhaseUnscheduled {
        /// Phase identifier.
        phase_id: String,
    },
    /// Assignments were created, moved, split, or deleted.
    AssignmentsChanged {
        /// Touched assignment IDs.
        assignment_ids: Vec<String>,
        /// Applied to the what-if scratch copy only.
        simulated: bool,
    },
    /// The store rejected a request.
    StoreFailed {
        /// The store's error.
        error: StoreError,
    },
    /// What-if mode started.
    WhatIfEntered,
    /// What-if mode ended; local changes were discarded.
    WhatIfExited,
    /// Date range, zoom, or column width changed.
    ViewportChanged {
        /// First visible day.
        from: NaiveDate,
        /// Day after the last visible day.
        to: NaiveDate,
        /// Column granularity.
        zoom: Zoom,
    },
}

/// Receives grid events.
pub trait GridObserver: Send + Sync {
    /// Called synchronously for each event, in emission order.
    fn on_event(&self, event: &GridEvent);
}

impl<F> GridObserver for F
where
    F: Fn(&GridEvent) + Send + Sync,
{
    fn on_event(&self, event: &GridEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
