//! Planning-grid domain models.
//!
//! Read snapshots of the entities owned by the external store, plus the
//! work calendar used to classify non-working days.
//!
//! # Domain Mappings
//!
//! | u-plangrid | Agency | Engineering | Consulting |
//! |------------|--------|-------------|------------|
//! | Person | Designer | Engineer | Consultant |
//! | Phase | Deliverable | Milestone | Workstream |
//! | Assignment | Booking | Allocation | Staffing |

mod assignment;
pub mod calendar;
mod person;
mod phase;
mod snapshot;

pub(crate) use assignment::add_days;
pub use assignment::Assignment;
pub use calendar::{day_status, DayStatus, LeaveRange, WorkCalendar};
pub use person::{Person, DEFAULT_WEEKLY_HOURS};
pub use phase::{Phase, PhaseStatus};
pub use snapshot::ScheduleSnapshot;
