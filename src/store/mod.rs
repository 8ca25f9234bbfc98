//! External schedule store boundary.
//!
//! The canonical schedule lives in an external CRUD store. This module
//! defines the operations the grid consumes from it, the request payloads,
//! and the store error type. Transport is up to the implementor.
//!
//! # Submodules
//!
//! - [`pool`]: bounded-concurrency task pool for batched fetches
//! - [`memory`]: in-memory store for tests and offline hosts

pub mod memory;
pub mod pool;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::models::{Assignment, Person, Phase};

/// Result alias for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// A rejected or failed store request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced entity does not exist in the store.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity kind ("phase", "assignment", ...).
        kind: &'static str,
        /// Entity identifier.
        id: String,
    },
    /// The store refused the request.
    #[error("store rejected {operation}: {message}")]
    Rejected {
        /// Operation name.
        operation: &'static str,
        /// Store-provided reason.
        message: String,
    },
    /// The request never completed (transport failure, task panic).
    #[error("store request {operation} failed: {message}")]
    Unavailable {
        /// Operation name.
        operation: &'static str,
        /// Failure description.
        message: String,
    },
}

/// Payload for creating an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    /// Assigned person.
    pub person_id: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Span length (days).
    pub assigned_days: u32,
    /// Lineage parent, set for split products.
    pub parent_assignment_id: Option<String>,
}

impl AssignmentDraft {
    /// Creates a draft without lineage.
    pub fn new(person_id: impl Into<String>, start_date: NaiveDate, assigned_days: u32) -> Self {
        Self {
            person_id: person_id.into(),
            start_date,
            assigned_days,
            parent_assignment_id: None,
        }
    }

    /// Sets the lineage parent.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_assignment_id = Some(parent_id.into());
        self
    }
}

impl From<&Assignment> for AssignmentDraft {
    fn from(a: &Assignment) -> Self {
        Self {
            person_id: a.person_id.clone(),
            start_date: a.start_date,
            assigned_days: a.assigned_days,
            parent_assignment_id: a.parent_assignment_id.clone(),
        }
    }
}

/// Partial update of an assignment. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPatch {
    /// New person.
    pub person_id: Option<String>,
    /// New first day.
    pub start_date: Option<NaiveDate>,
    /// New span length.
    pub assigned_days: Option<u32>,
}

impl AssignmentPatch {
    /// Applies the patch in place.
    pub fn apply_to(&self, assignment: &mut Assignment) {
        if let Some(person_id) = &self.person_id {
            assignment.person_id = person_id.clone();
        }
        if let Some(start_date) = self.start_date {
            assignment.start_date = start_date;
        }
        if let Some(days) = self.assigned_days {
            assignment.assigned_days = days;
        }
    }
}

/// Move/copy request for a legacy (phase-less) task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTaskRequest {
    /// Task identifier.
    pub task_id: String,
    /// New first day.
    pub new_start_date: Option<NaiveDate>,
    /// New primary person.
    pub new_primary_person_id: Option<String>,
    /// New duration (days).
    pub new_duration_days: Option<u32>,
    /// Create a copy instead of moving.
    pub copy: bool,
    /// Lineage parent recorded on the copy. Ignored for plain moves.
    pub parent_assignment_id: Option<String>,
}

/// Operations consumed from the external store.
///
/// Futures must be `Send` so batched fetches can run on a task pool.
pub trait ScheduleStore: Send + Sync + 'static {
    /// Lists all people.
    fn list_people(&self) -> impl Future<Output = StoreResult<Vec<Person>>> + Send;

    /// Lists the phases of a project.
    fn list_phases(&self, project_id: &str)
        -> impl Future<Output = StoreResult<Vec<Phase>>> + Send;

    /// Lists the assignments of a phase.
    fn list_assignments(
        &self,
        phase_id: &str,
    ) -> impl Future<Output = StoreResult<Vec<Assignment>>> + Send;

    /// Lists every assignment, including legacy tasks.
    fn list_all_assignments(&self) -> impl Future<Output = StoreResult<Vec<Assignment>>> + Send;

    /// Creates an assignment for a phase.
    fn create_assignment(
        &self,
        phase_id: &str,
        draft: AssignmentDraft,
    ) -> impl Future<Output = StoreResult<Assignment>> + Send;

    /// Updates an assignment.
    fn update_assignment(
        &self,
        phase_id: &str,
        assignment_id: &str,
        patch: AssignmentPatch,
    ) -> impl Future<Output = StoreResult<Assignment>> + Send;

    /// Deletes an assignment.
    fn delete_assignment(
        &self,
        phase_id: &str,
        assignment_id: &str,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Moves or copies a legacy task.
    fn move_task(&self, request: MoveTaskRequest) -> impl Future<Output = StoreResult<()>> + Send;
}
