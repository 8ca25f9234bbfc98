//! Resource-planning grid engine for the U-Engine ecosystem.
//!
//! Lays phases of work out on a person × calendar grid: segments the
//! timeline into columns, marks non-working days, packs overlapping
//! bookings into lanes, resolves drag/drop gestures to (person, date)
//! targets, and splits assignments between people. The canonical schedule
//! lives in an external store; this crate works on fetched snapshots and
//! proposes mutations.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Person`, `Phase`, `Assignment`,
//!   `ScheduleSnapshot`, `WorkCalendar`
//! - **`timeline`**: Calendar segmentation into day/week/biweek columns
//! - **`layout`**: Lane packing and pixel layout
//! - **`drag`**: Pointer → cell resolution and drop previews
//! - **`split`**: Effort-conserving assignment splitting
//! - **`store`**: External store boundary, bounded fetch pool, in-memory store
//! - **`grid`**: The coordinator (viewport, gestures, what-if mode, observers)
//! - **`balance`**: Greedy auto-balance proposals
//! - **`kpi`**: Per-person load and phase progress
//! - **`validation`**: Snapshot integrity checks
//! - **`config`**: TOML-loadable settings
//!
//! # Architecture
//!
//! Everything below `grid` is synchronous and pure. Only the store boundary
//! is async; the coordinator awaits it on refresh and commit.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Golumbic (2004), "Algorithmic Graph Theory and Perfect Graphs", Ch. 8 (interval graphs)

pub mod balance;
pub mod config;
pub mod drag;
pub mod error;
pub mod grid;
pub mod kpi;
pub mod layout;
pub mod models;
pub mod split;
pub mod store;
pub mod timeline;
pub mod validation;

pub use config::{ConfigError, GridConfig};
pub use error::{GridError, GridResult};
pub use grid::{DropModifiers, GridCoordinator, GridEvent, GridObserver, MutationIntent};
pub use store::{ScheduleStore, StoreError};
