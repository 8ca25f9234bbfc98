//! Assignment splitting.
//!
//! Divides one assignment into two across people, conserving effort:
//! `left.assigned_days + right.assigned_days == original.assigned_days`.
//!
//! # Modes
//! - **Time**: sequential. The left part keeps the first `split_after_days`
//!   days; the right part starts the day after the left part ends.
//! - **Percent**: parallel. Both parts share the original start date;
//!   `left = round(days · pct / 100)`, `right = days − left`.
//!
//! Splitting never persists anything; callers submit the pair to the store.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{add_days, Assignment};

/// How to divide an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SplitMode {
    /// Sequential split after a day offset.
    Time {
        /// Days kept by the left part, in `(0, assigned_days)`.
        split_after_days: u32,
    },
    /// Parallel split by share of effort.
    Percent {
        /// Share kept by the left part, in `(0, 100)`.
        left_percent: f64,
    },
}

/// Reasons a split is rejected. Nothing is produced on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    /// The original has no effort to divide.
    #[error("assignment '{0}' has no assigned days to split")]
    EmptyAssignment(String),
    /// Time-mode offset outside `(0, assigned_days)`.
    #[error("split offset {split_after_days} must be between 1 and {max}")]
    OffsetOutOfRange {
        /// Requested offset.
        split_after_days: u32,
        /// Largest valid offset.
        max: u32,
    },
    /// Percent outside `(0, 100)`.
    #[error("left share {0}% must be strictly between 0 and 100")]
    PercentOutOfRange(f64),
    /// Rounding left one side with zero days.
    #[error("a {left_percent}% split of {assigned_days} days leaves an empty side")]
    EmptySegment {
        /// Original effort.
        assigned_days: u32,
        /// Requested share.
        left_percent: f64,
    },
    /// The pair no longer divides the current original.
    #[error("split of '{assignment_id}' no longer matches it: {reason}")]
    Stale {
        /// Original assignment.
        assignment_id: String,
        /// First mismatch found.
        reason: &'static str,
    },
}

/// The two records produced by a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    /// The original assignment, shortened.
    pub left: Assignment,
    /// The new assignment for the other person.
    pub right: Assignment,
}

impl SplitResult {
    /// Total days across both parts.
    pub fn total_days(&self) -> u32 {
        self.left.assigned_days + self.right.assigned_days
    }

    /// Checks that this pair still divides `original` as it is now.
    pub fn verify_against(&self, original: &Assignment) -> Result<(), SplitError> {
        let stale = |reason| {
            Err(SplitError::Stale {
                assignment_id: original.id.clone(),
                reason,
            })
        };
        if self.left.id != original.id {
            return stale("left part is a different assignment");
        }
        if self.left.assigned_days == 0 || self.right.assigned_days == 0 {
            return stale("a part has no days");
        }
        if self.total_days() != original.assigned_days {
            return stale("assigned days are not conserved");
        }
        if self.left.start_date != original.start_date {
            return stale("start date changed");
        }
        if self.left.phase_id != original.phase_id || self.right.phase_id != original.phase_id {
            return stale("phase changed");
        }
        Ok(())
    }
}

/// Left/right day counts of a percent split.
///
/// The right side is derived from the left, so the total is always
/// conserved, whatever the rounding.
pub fn percent_split_days(assigned_days: u32, left_percent: f64) -> (u32, u32) {
    let raw = (f64::from(assigned_days) * left_percent / 100.0).round();
    let left = raw.clamp(0.0, f64::from(assigned_days)) as u32;
    (left, assigned_days - left)
}

/// Splits an assignment, giving the right part to `person_id_right`.
///
/// The right part gets a fresh ID and records the lineage root
/// (`original.parent_assignment_id`, else `original.id`) as its parent.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_plangrid::models::Assignment;
/// use u_plangrid::split::{split, SplitMode};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let original = Assignment::new("a1", "ph1", "ada", start, 10);
/// let parts = split(&original, SplitMode::Time { split_after_days: 4 }, "bob").unwrap();
/// assert_eq!(parts.left.assigned_days, 4);
/// assert_eq!(parts.right.start_date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
/// assert_eq!(parts.right.assigned_days, 6);
/// ```
pub fn split(
    original: &Assignment,
    mode: SplitMode,
    person_id_right: &str,
) -> Result<SplitResult, SplitError> {
    let days = original.assigned_days;
    if days == 0 {
        return Err(SplitError::EmptyAssignment(original.id.clone()));
    }

    let (left_days, right_days, right_start) = match mode {
        SplitMode::Time { split_after_days } => {
            if split_after_days == 0 || split_after_days >= days {
                return Err(SplitError::OffsetOutOfRange {
                    split_after_days,
                    max: days.saturating_sub(1),
                });
            }
            (
                split_after_days,
                days - split_after_days,
                add_days(original.start_date, i64::from(split_after_days)),
            )
        }
        SplitMode::Percent { left_percent } => {
            if !(left_percent > 0.0 && left_percent < 100.0) {
                return Err(SplitError::PercentOutOfRange(left_percent));
            }
            let (left, right) = percent_split_days(days, left_percent);
            if left == 0 || right == 0 {
                return Err(SplitError::EmptySegment {
                    assigned_days: days,
                    left_percent,
                });
            }
            (left, right, original.start_date)
        }
    };

    let left = Assignment {
        assigned_days: left_days,
        ..original.clone()
    };
    let right = Assignment {
        id: Uuid::new_v4().to_string(),
        phase_id: original.phase_id.clone(),
        person_id: person_id_right.to_string(),
        start_date: right_start,
        assigned_days: right_days,
        parent_assignment_id: Some(original.lineage_root().to_string()),
    };

    Ok(SplitResult { left, right })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn original(days: u32) -> Assignment {
        Assignment::new("a1", "ph1", "ada", d(2025, 1, 1), days)
    }

    #[test]
    fn test_time_split_contiguous() {
        let parts = split(&original(10), SplitMode::Time { split_after_days: 4 }, "bob").unwrap();
        assert_eq!(parts.left.id, "a1");
        assert_eq!(parts.left.person_id, "ada");
        assert_eq!(parts.left.assigned_days, 4);
        assert_eq!(parts.left.start_date, d(2025, 1, 1));
        assert_eq!(parts.right.person_id, "bob");
        assert_eq!(parts.right.start_date, d(2025, 1, 5));
        assert_eq!(parts.right.assigned_days, 6);
        assert_eq!(parts.right.phase_id.as_deref(), Some("ph1"));
        assert_eq!(parts.right.parent_assignment_id.as_deref(), Some("a1"));
        assert_ne!(parts.right.id, "a1");
        assert_eq!(parts.left.end_exclusive(), parts.right.start_date);
    }

    #[test]
    fn test_percent_split_parallel() {
        let parts = split(&original(10), SplitMode::Percent { left_percent: 30.0 }, "bob").unwrap();
        assert_eq!(parts.left.assigned_days, 3);
        assert_eq!(parts.right.assigned_days, 7);
        assert_eq!(parts.right.start_date, parts.left.start_date);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        let parts = split(&original(9), SplitMode::Percent { left_percent: 50.0 }, "bob").unwrap();
        assert_eq!(parts.left.assigned_days, 5); // 4.5 → 5
        assert_eq!(parts.right.assigned_days, 4);
    }

    #[test]
    fn test_split_keeps_lineage_root() {
        let child = original(10).with_parent("root");
        let parts = split(&child, SplitMode::Time { split_after_days: 2 }, "bob").unwrap();
        assert_eq!(parts.right.parent_assignment_id.as_deref(), Some("root"));
        assert_eq!(parts.left.parent_assignment_id.as_deref(), Some("root"));
    }

    #[test]
    fn test_rejections() {
        let a = original(10);
        assert!(matches!(
            split(&a, SplitMode::Time { split_after_days: 0 }, "bob"),
            Err(SplitError::OffsetOutOfRange { .. })
        ));
        assert!(matches!(
            split(&a, SplitMode::Time { split_after_days: 10 }, "bob"),
            Err(SplitError::OffsetOutOfRange { max: 9, .. })
        ));
        assert!(matches!(
            split(&a, SplitMode::Percent { left_percent: 0.0 }, "bob"),
            Err(SplitError::PercentOutOfRange(_))
        ));
        assert!(matches!(
            split(&a, SplitMode::Percent { left_percent: 100.0 }, "bob"),
            Err(SplitError::PercentOutOfRange(_))
        ));
        assert!(matches!(
            split(&a, SplitMode::Percent { left_percent: f64::NAN }, "bob"),
            Err(SplitError::PercentOutOfRange(_))
        ));
    }

    #[test]
    fn test_reject_empty_assignment() {
        let mode = SplitMode::Percent { left_percent: 50.0 };
        let err = split(&original(0), mode, "bob").unwrap_err();
        assert_eq!(err, SplitError::EmptyAssignment("a1".into()));
    }

    #[test]
    fn test_reject_empty_segment_after_rounding() {
        let mode = SplitMode::Percent { left_percent: 30.0 };
        let err = split(&original(1), mode, "bob").unwrap_err();
        assert!(matches!(err, SplitError::EmptySegment { assigned_days: 1, .. }));
    }

    #[test]
    fn test_split_mode_serde() {
        let json = r#"{"mode":"percent","left_percent":25.0}"#;
        let mode: SplitMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode, SplitMode::Percent { left_percent: 25.0 });
    }

    #[test]
    fn test_verify_against_current_original() {
        let parts = split(&original(4), SplitMode::Time { split_after_days: 2 }, "bob").unwrap();
        assert!(parts.verify_against(&original(4)).is_ok());

        let grown = original(10);
        assert!(matches!(
            parts.verify_against(&grown),
            Err(SplitError::Stale { reason: "assigned days are not conserved", .. })
        ));

        let moved = Assignment::new("a1", "ph1", "ada", d(2025, 2, 1), 4);
        assert!(matches!(
            parts.verify_against(&moved),
            Err(SplitError::Stale { reason: "start date changed", .. })
        ));

        let rephased = Assignment::new("a1", "ph2", "ada", d(2025, 1, 1), 4);
        assert!(parts.verify_against(&rephased).is_err());

        let other = Assignment::new("a2", "ph1", "ada", d(2025, 1, 1), 4);
        assert!(parts.verify_against(&other).is_err());
    }

    proptest! {
        #[test]
        fn prop_time_split_conserves(days in 2u32..1000, frac in 0.0f64..1.0) {
            let after = 1 + ((f64::from(days - 2)) * frac) as u32;
            let mode = SplitMode::Time { split_after_days: after };
            let parts = split(&original(days), mode, "bob").unwrap();
            prop_assert_eq!(parts.total_days(), days);
            prop_assert_eq!(parts.right.start_date, add_days(d(2025, 1, 1), i64::from(after)));
        }

        #[test]
        fn prop_percent_split_conserves(days in 1u32..=1000, pct in 0.001f64..99.999) {
            let (left, right) = percent_split_days(days, pct);
            prop_assert_eq!(left + right, days);
            prop_assert_eq!(left, (f64::from(days) * pct / 100.0).round() as u32);
        }
    }
}
