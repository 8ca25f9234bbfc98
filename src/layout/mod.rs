//! Renderable grid layout.
//!
//! Combines the segmented columns, the work calendar, and per-person lane
//! packing into pixel rectangles a UI host can draw directly.
//!
//! # Geometry
//! - Column `i` spans `[i · column_width, (i + 1) · column_width)`.
//! - A person row is `lane_count · lane_height` tall; rows stack in
//!   snapshot order starting at `y = 0`.
//! - A span covers `[start_date, end_exclusive)` measured in calendar days
//!   per column, so contiguous bookings meet edge to edge at every zoom.

pub mod lanes;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{add_days, Assignment, DayStatus, Person, ScheduleSnapshot, WorkCalendar};
use crate::timeline::Segmentation;
use lanes::{pack, Span};

/// Read-only project → color lookup injected by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorTable {
    by_project: HashMap<String, String>,
}

impl ColorTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project color.
    pub fn with_color(mut self, project_id: impl Into<String>, color: impl Into<String>) -> Self {
        self.by_project.insert(project_id.into(), color.into());
        self
    }

    /// Color for a project, if configured.
    pub fn project_color(&self, project_id: &str) -> Option<&str> {
        self.by_project.get(project_id).map(String::as_str)
    }
}

/// Pixel sizes of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Width of one column (px).
    pub column_width_px: f64,
    /// Height of one lane (px).
    pub lane_height_px: f64,
}

/// An assignment positioned in grid pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedSpan {
    /// Assignment identifier.
    pub assignment_id: String,
    /// Phase identifier (`None` for legacy tasks).
    pub phase_id: Option<String>,
    /// Display label.
    pub label: String,
    /// Fill color.
    pub color: String,
    /// First day of the assignment.
    pub start_date: NaiveDate,
    /// Assigned days.
    pub assigned_days: u32,
    /// Lane within the person row.
    pub lane: usize,
    /// Left edge (px), clipped to the grid.
    pub left: f64,
    /// Top edge (px), relative to the grid.
    pub top: f64,
    /// Width (px), clipped to the grid.
    pub width: f64,
    /// Height (px).
    pub height: f64,
}

/// A non-working (person, day) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonWorkingCell {
    /// The day.
    pub date: NaiveDate,
    /// Column containing the day.
    pub column_index: usize,
    /// Left edge (px).
    pub left: f64,
    /// Width (px), a fraction of the column in week/biweek zoom.
    pub width: f64,
    /// Why the day is non-working.
    pub status: DayStatus,
}

/// One person's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRow {
    /// Person identifier.
    pub person_id: String,
    /// Display name.
    pub name: String,
    /// Top edge (px).
    pub top: f64,
    /// Row height (px).
    pub height: f64,
    /// Lanes in the row (≥ 1).
    pub lane_count: usize,
    /// Positioned assignments.
    pub spans: Vec<PositionedSpan>,
    /// Non-working days in view.
    pub non_working: Vec<NonWorkingCell>,
}

/// The full renderable layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Columns and month headers.
    pub segmentation: Segmentation,
    /// Person rows in snapshot order.
    pub rows: Vec<PersonRow>,
    /// Grid width (px).
    pub total_width: f64,
    /// Grid height (px).
    pub total_height: f64,
}

impl GridLayout {
    /// Row heights in display order.
    pub fn row_heights(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.height).collect()
    }

    /// Row for a person.
    pub fn row(&self, person_id: &str) -> Option<&PersonRow> {
        self.rows.iter().find(|r| r.person_id == person_id)
    }

    /// Finds a positioned span by assignment ID.
    pub fn span(&self, assignment_id: &str) -> Option<&PositionedSpan> {
        self.rows
            .iter()
            .flat_map(|r| r.spans.iter())
            .find(|s| s.assignment_id == assignment_id)
    }
}

/// Builds the layout for every person in the snapshot.
pub fn build_layout(
    snapshot: &ScheduleSnapshot,
    segmentation: &Segmentation,
    calendar: &WorkCalendar,
    colors: &ColorTable,
    geometry: Geometry,
) -> GridLayout {
    let column_count = segmentation.columns.len();
    let total_width = column_count as f64 * geometry.column_width_px;

    let (from, to) = match (segmentation.first_day(), segmentation.end_exclusive()) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return GridLayout {
                segmentation: segmentation.clone(),
                rows: Vec::new(),
                total_width: 0.0,
                total_height: 0.0,
            }
        }
    };

    let mut rows = Vec::with_capacity(snapshot.people.len());
    let mut top = 0.0;
    for person in &snapshot.people {
        let visible = snapshot.visible_assignments(&person.id, from, to);
        let row = build_row(
            person,
            &visible,
            snapshot,
            segmentation,
            calendar,
            colors,
            geometry,
            top,
        );
        top += row.height;
        rows.push(row);
    }

    GridLayout {
        segmentation: segmentation.clone(),
        rows,
        total_width,
        total_height: top,
    }
}

#[allow(clippy::too_many_arguments)]
fn build_row(
    person: &Person,
    visible: &[&Assignment],
    snapshot: &ScheduleSnapshot,
    segmentation: &Segmentation,
    calendar: &WorkCalendar,
    colors: &ColorTable,
    geometry: Geometry,
    top: f64,
) -> PersonRow {
    let column_count = segmentation.columns.len() as f64;

    let spans: Vec<Span> = visible
        .iter()
        .map(|a| {
            let start = segmentation.column_offset(a.start_date);
            let end = segmentation.column_offset(a.end_exclusive());
            Span::new(a.id.clone(), start, end - start)
        })
        .collect();
    let packing = pack(&spans);

    let positioned = visible
        .iter()
        .zip(&packing.placed)
        .map(|(a, placed)| {
            let left_col = placed.span.start.max(0.0);
            let right_col = placed.span.end().min(column_count);
            let (label, color) = describe(a, person, snapshot, colors);
            PositionedSpan {
                assignment_id: a.id.clone(),
                phase_id: a.phase_id.clone(),
                label,
                color,
                start_date: a.start_date,
                assigned_days: a.assigned_days,
                lane: placed.lane,
                left: left_col * geometry.column_width_px,
                top: top + placed.lane as f64 * geometry.lane_height_px,
                width: (right_col - left_col).max(0.0) * geometry.column_width_px,
                height: geometry.lane_height_px,
            }
        })
        .collect();

    PersonRow {
        person_id: person.id.clone(),
        name: person.name.clone(),
        top,
        height: packing.lane_count as f64 * geometry.lane_height_px,
        lane_count: packing.lane_count,
        spans: positioned,
        non_working: non_working_cells(&person.id, segmentation, calendar, geometry),
    }
}

fn describe(
    assignment: &Assignment,
    person: &Person,
    snapshot: &ScheduleSnapshot,
    colors: &ColorTable,
) -> (String, String) {
    let phase = assignment
        .phase_id
        .as_deref()
        .and_then(|id| snapshot.phase(id));
    let label = match phase {
        Some(ph) if !ph.title.is_empty() => ph.title.clone(),
        Some(ph) => ph.id.clone(),
        None => format!("Task {}", assignment.id),
    };
    let color = phase
        .and_then(|ph| colors.project_color(&ph.project_id))
        .unwrap_or(&person.color)
        .to_string();
    (label, color)
}

/// Non-working cells for one person across all columns in view.
pub fn non_working_cells(
    person_id: &str,
    segmentation: &Segmentation,
    calendar: &WorkCalendar,
    geometry: Geometry,
) -> Vec<NonWorkingCell> {
    let per_column = f64::from(segmentation.zoom.days_per_column());
    let day_width = geometry.column_width_px / per_column;
    let mut cells = Vec::new();

    for (column_index, column) in segmentation.columns.iter().enumerate() {
        for offset in 0..column.span_days() {
            let date = add_days(column.start, offset);
            let status = calendar.day_status(person_id, date);
            if !status.non_work {
                continue;
            }
            cells.push(NonWorkingCell {
                date,
                column_index,
                left: column_index as f64 * geometry.column_width_px + offset as f64 * day_width,
                width: day_width,
                status,
            });
        }
    }
    cells
}
