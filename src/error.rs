//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::split::SplitError;
use crate::store::StoreError;

/// Errors surfaced by the grid coordinator.
#[derive(Debug, Error)]
pub enum GridError {
    /// Split parameters out of range; nothing was sent to the store.
    #[error("invalid split: {0}")]
    InvalidSplit(#[from] SplitError),
    /// The external store rejected or failed a request.
    #[error("store request failed: {0}")]
    StoreRequestFailed(#[from] StoreError),
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The snapshot has no assignment with this ID.
    #[error("unknown assignment: {0}")]
    UnknownAssignment(String),
    /// The snapshot has no phase with this ID.
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
    /// The snapshot has no person with this ID.
    #[error("unknown person: {0}")]
    UnknownPerson(String),
    /// A mutation would book zero days.
    #[error("assignment for '{0}' must book at least one day")]
    EmptyAssignment(String),
}

/// Result alias for coordinator calls.
pub type GridResult<T> = Result<T, GridError>;
