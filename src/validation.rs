//! Snapshot integrity checks.
//!
//! Checks the structural integrity of a fetched snapshot before layout.
//! Detects:
//! - Duplicate IDs (people, phases, assignments)
//! - Assignments referencing unknown people or phases
//! - Zero-day assignments
//! - Dependencies on unknown phases
//! - Circular phase dependencies
//!
//! Issues are reported, never repaired: the store stays the source of truth.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{Phase, ScheduleSnapshot};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An assignment references a person that doesn't exist.
    InvalidPersonReference,
    /// An assignment references a phase that doesn't exist.
    InvalidPhaseReference,
    /// An assignment spans zero days.
    EmptyAssignment,
    /// A phase depends on a phase that doesn't exist.
    InvalidDependency,
    /// Phase dependencies contain a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a snapshot.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(snapshot: &ScheduleSnapshot) -> ValidationResult {
    let mut errors = Vec::new();

    let person_ids = collect_ids(
        snapshot.people.iter().map(|p| p.id.as_str()),
        "person",
        &mut errors,
    );
    let phase_ids = collect_ids(
        snapshot.phases.iter().map(|p| p.id.as_str()),
        "phase",
        &mut errors,
    );
    collect_ids(
        snapshot.assignments.iter().map(|a| a.id.as_str()),
        "assignment",
        &mut errors,
    );

    for a in &snapshot.assignments {
        if !person_ids.contains(a.person_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPersonReference,
                format!("Assignment '{}' references unknown person '{}'", a.id, a.person_id),
            ));
        }
        if let Some(phase_id) = a.phase_id.as_deref() {
            if !phase_ids.contains(phase_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPhaseReference,
                    format!("Assignment '{}' references unknown phase '{}'", a.id, phase_id),
                ));
            }
        }
        if a.assigned_days == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyAssignment,
                format!("Assignment '{}' has no assigned days", a.id),
            ));
        }
    }

    for phase in &snapshot.phases {
        if let Some(dep) = phase.depends_on.as_deref() {
            if !phase_ids.contains(dep) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Phase '{}' depends on unknown phase '{}'", phase.id, dep),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(&snapshot.phases) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
    }
    seen
}

/// Detects cycles in the phase dependency graph using DFS.
///
/// A back-edge (reaching a phase still on the recursion stack) means a
/// cycle. Phases are visited in snapshot order so the reported phase is
/// deterministic.
fn detect_cycles(phases: &[Phase]) -> Option<ValidationError> {
    // dependency → dependents
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for phase in phases {
        if let Some(dep) = phase.depends_on.as_deref() {
            adj.entry(dep).or_default().push(phase.id.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for phase in phases {
        let node = phase.id.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving phase '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true;
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
