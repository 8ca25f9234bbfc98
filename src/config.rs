//! Grid configuration.
//!
//! Loaded from TOML by the host. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! zoom = "week"
//! column_width_px = 48.0
//! projects = ["alpha", "beta"]
//!
//! [calendar]
//! weekend = ["Sat", "Sun"]
//! holidays = ["2025-12-25"]
//!
//! [[calendar.leaves.ada]]
//! start = "2025-08-27"
//! end = "2025-08-29"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drag::DEFAULT_PHASE_DAYS;
use crate::models::{WorkCalendar, DEFAULT_WEEKLY_HOURS};
use crate::timeline::Zoom;

/// Configuration loading/validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML was malformed or had wrong types.
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value was out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Grid settings supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Initial zoom level.
    pub zoom: Zoom,
    /// Column width (px).
    pub column_width_px: f64,
    /// Lane height (px).
    pub lane_height_px: f64,
    /// Duration proposed for a phase with nothing left to schedule.
    pub default_phase_days: u32,
    /// Maximum concurrent per-phase assignment fetches.
    pub fetch_concurrency: usize,
    /// Projects whose phases are loaded.
    pub projects: Vec<String>,
    /// Also load legacy (phase-less) tasks.
    pub include_legacy_tasks: bool,
    /// Hours in a standard full-time week.
    pub standard_week_hours: f64,
    /// Weekends, holidays, and leave.
    pub calendar: WorkCalendar,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            zoom: Zoom::Day,
            column_width_px: 32.0,
            lane_height_px: 28.0,
            default_phase_days: DEFAULT_PHASE_DAYS,
            fetch_concurrency: 4,
            projects: Vec::new(),
            include_legacy_tasks: false,
            standard_week_hours: DEFAULT_WEEKLY_HOURS,
            calendar: WorkCalendar::default(),
        }
    }
}

impl GridConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.column_width_px > 0.0) {
            return Err(invalid("column_width_px", "must be positive"));
        }
        if !(self.lane_height_px > 0.0) {
            return Err(invalid("lane_height_px", "must be positive"));
        }
        if self.default_phase_days == 0 {
            return Err(invalid("default_phase_days", "must be at least 1"));
        }
        if self.fetch_concurrency == 0 {
            return Err(invalid("fetch_concurrency", "must be at least 1"));
        }
        if !(self.standard_week_hours > 0.0) {
            return Err(invalid("standard_week_hours", "must be positive"));
        }
        Ok(())
    }

    /// Sets the projects to load.
    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects = projects.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the work calendar.
    pub fn with_calendar(mut self, calendar: WorkCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Enables loading legacy tasks.
    pub fn with_legacy_tasks(mut self, include: bool) -> Self {
        self.include_legacy_tasks = include;
        self
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
