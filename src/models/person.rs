//! Person model.
//!
//! People are the rows of the planning grid: each one carries a weekly
//! work-hour capacity and a display color. People are owned by the
//! external store and never mutated inside a scheduling session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default weekly capacity (hours).
pub const DEFAULT_WEEKLY_HOURS: f64 = 40.0;

/// A person that assignments are scheduled onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique person identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contracted work hours per week.
    pub weekly_hours: f64,
    /// Display color (CSS-style string, e.g. `"#4f8cc9"`).
    pub color: String,
    /// Domain-specific metadata.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Person {
    /// Creates a full-time person with no name or color.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            weekly_hours: DEFAULT_WEEKLY_HOURS,
            color: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weekly capacity. Negative values are clamped to zero.
    pub fn with_weekly_hours(mut self, hours: f64) -> Self {
        self.weekly_hours = hours.max(0.0);
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Fraction of a standard week this person works (1.0 = full time).
    pub fn capacity_ratio(&self, standard_week_hours: f64) -> f64 {
        if standard_week_hours <= 0.0 {
            return 0.0;
        }
        self.weekly_hours / standard_week_hours
    }
}
