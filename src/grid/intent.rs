//! Mutations proposed by gestures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::balance::Placement;

/// Modifier keys held when the item was dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropModifiers {
    /// Copy instead of move.
    pub copy: bool,
}

impl DropModifiers {
    /// Plain move.
    pub const MOVE: Self = Self { copy: false };
    /// Copy.
    pub const COPY: Self = Self { copy: true };
}

/// A mutation for the host to confirm and commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationIntent {
    /// Book a phase on a person.
    Create {
        /// Phase to book.
        phase_id: String,
        /// Target person.
        person_id: String,
        /// First day.
        start_date: NaiveDate,
        /// Days to book.
        assigned_days: u32,
    },
    /// Move an existing phase assignment.
    Move {
        /// Owning phase.
        phase_id: String,
        /// Assignment to move.
        assignment_id: String,
        /// New person.
        person_id: String,
        /// New first day.
        start_date: NaiveDate,
    },
    /// Move or copy a legacy task.
    MoveTask {
        /// Task to move.
        task_id: String,
        /// New primary person.
        person_id: String,
        /// New first day.
        start_date: NaiveDate,
        /// Copy instead of move.
        copy: bool,
    },
    /// Remove a phase assignment.
    Delete {
        /// Owning phase.
        phase_id: String,
        /// Assignment to remove.
        assignment_id: String,
    },
}

impl MutationIntent {
    /// The existing assignment this intent touches, if any.
    pub fn assignment_id(&self) -> Option<&str> {
        match self {
            Self::Create { .. } => None,
            Self::Move { assignment_id, .. } | Self::Delete { assignment_id, .. } => {
                Some(assignment_id)
            }
            Self::MoveTask { task_id, .. } => Some(task_id),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Move { .. } => "move",
            Self::MoveTask { copy: true, .. } => "copy_task",
            Self::MoveTask { .. } => "move_task",
            Self::Delete { .. } => "delete",
        }
    }
}

impl From<Placement> for MutationIntent {
    fn from(p: Placement) -> Self {
        Self::Create {
            phase_id: p.phase_id,
            person_id: p.person_id,
            start_date: p.start_date,
            assigned_days: p.assigned_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serde_tag() {
        let intent = MutationIntent::Delete {
            phase_id: "ph1".into(),
            assignment_id: "a1".into(),
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("\"kind\":\"delete\""));
        let back: MutationIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intent);
        assert_eq!(back.assignment_id(), Some("a1"));
    }

    #[test]
    fn test_from_placement() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let intent = MutationIntent::from(Placement {
            phase_id: "ph1".into(),
            person_id: "p1".into(),
            start_date: start,
            assigned_days: 3,
        });
        assert_eq!(intent.kind(), "create");
        assert!(intent.assignment_id().is_none());
    }
}
