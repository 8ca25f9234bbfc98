//! Drag/drop resolution.
//!
//! Converts a pointer position on the grid surface into a
//! (person row, column, date) target, and estimates the live preview
//! rectangle of the dragged item.
//!
//! # Resolution Rules
//! - Pointer left of / above the grid origin → no target.
//! - `column = round(dx / column_width)`, clamped to the last column.
//! - `person = floor(dy / lane_height)`, clamped to the last person.
//! - `date = columns[0].start + column · days_per_column(zoom)`.
//!
//! A miss is not an error: the gesture continues without a preview.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{add_days, Person};
use crate::timeline::{Column, Zoom};

/// Preview duration for an item with no known length.
pub const DEFAULT_PHASE_DAYS: u32 = 5;

/// A point in host pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate (px).
    pub x: f64,
    /// Vertical coordinate (px).
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The cell a pointer resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    /// Column index.
    pub column_index: usize,
    /// Person row index.
    pub person_index: usize,
    /// Calendar date of the column start.
    pub date: NaiveDate,
}

/// Preview rectangle for a dragged item (grid-relative px).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropPreview {
    /// Resolved target cell.
    pub target: DropTarget,
    /// Left edge (px).
    pub left: f64,
    /// Top edge (px).
    pub top: f64,
    /// Width (px).
    pub width: f64,
    /// Height (px).
    pub height: f64,
}

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragItem {
    /// A phase from the unscheduled list.
    Phase {
        /// Phase identifier.
        phase_id: String,
    },
    /// An assignment already on the grid.
    Assignment {
        /// Assignment identifier.
        assignment_id: String,
    },
}

/// Drag gesture state.
///
/// `Idle → Dragging → Committing → Idle`; `Dragging → Idle` on cancel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer is down on an item.
    Dragging {
        /// The dragged item.
        item: DragItem,
        /// Natural duration used for the preview (days).
        natural_days: u32,
        /// Latest preview, if the pointer is over a valid cell.
        preview: Option<DropPreview>,
    },
    /// Dropped; the resulting intent is being committed.
    Committing {
        /// The dropped item.
        item: DragItem,
    },
}

impl DragState {
    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Latest preview while dragging.
    pub fn preview(&self) -> Option<&DropPreview> {
        match self {
            Self::Dragging { preview, .. } => preview.as_ref(),
            _ => None,
        }
    }
}

/// Resolves a pointer to a (column, person, date) target with uniform rows.
pub fn resolve_drop(
    pointer: Point,
    grid_origin: Point,
    zoom: Zoom,
    column_width_px: f64,
    lane_height_px: f64,
    columns: &[Column],
    people: &[Person],
) -> Option<DropTarget> {
    if people.is_empty() || lane_height_px <= 0.0 {
        return None;
    }
    let dy = pointer.y - grid_origin.y;
    if dy < 0.0 {
        return None;
    }
    let column_index = resolve_column(pointer, grid_origin, column_width_px, columns.len())?;
    let person_index = ((dy / lane_height_px).floor() as usize).min(people.len() - 1);

    Some(DropTarget {
        column_index,
        person_index,
        date: column_date(columns, column_index, zoom)?,
    })
}

/// Resolves a pointer against rows of varying height (stacked lanes).
///
/// `row_heights[i]` is the pixel height of person row `i`; rows stack from
/// the grid origin. Pointers below the last row clamp to it.
pub fn resolve_drop_in_rows(
    pointer: Point,
    grid_origin: Point,
    zoom: Zoom,
    column_width_px: f64,
    row_heights: &[f64],
    columns: &[Column],
) -> Option<DropTarget> {
    if row_heights.is_empty() {
        return None;
    }
    let dy = pointer.y - grid_origin.y;
    if dy < 0.0 {
        return None;
    }
    let column_index = resolve_column(pointer, grid_origin, column_width_px, columns.len())?;

    let mut bottom = 0.0;
    let mut person_index = row_heights.len() - 1;
    for (idx, height) in row_heights.iter().enumerate() {
        bottom += height;
        if dy < bottom {
            person_index = idx;
            break;
        }
    }

    Some(DropTarget {
        column_index,
        person_index,
        date: column_date(columns, column_index, zoom)?,
    })
}

/// Resolves the target and preview rectangle for an item of known duration.
#[allow(clippy::too_many_arguments)]
pub fn compute_drop_preview(
    pointer: Point,
    grid_origin: Point,
    zoom: Zoom,
    column_width_px: f64,
    lane_height_px: f64,
    columns: &[Column],
    people: &[Person],
    duration_days: u32,
) -> Option<DropPreview> {
    let target = resolve_drop(
        pointer,
        grid_origin,
        zoom,
        column_width_px,
        lane_height_px,
        columns,
        people,
    )?;
    Some(preview_rect(
        target,
        zoom,
        column_width_px,
        target.person_index as f64 * lane_height_px,
        lane_height_px,
        duration_days,
    ))
}

/// Builds the preview rectangle for a resolved target.
///
/// Width is `(duration_days / workdays_per_column) · column_width`.
pub fn preview_rect(
    target: DropTarget,
    zoom: Zoom,
    column_width_px: f64,
    row_top: f64,
    row_height: f64,
    duration_days: u32,
) -> DropPreview {
    let columns_wide = f64::from(duration_days) / f64::from(zoom.workdays_per_column());
    DropPreview {
        target,
        left: target.column_index as f64 * column_width_px,
        top: row_top,
        width: columns_wide * column_width_px,
        height: row_height,
    }
}

fn resolve_column(
    pointer: Point,
    grid_origin: Point,
    column_width_px: f64,
    column_count: usize,
) -> Option<usize> {
    if column_count == 0 || column_width_px <= 0.0 {
        return None;
    }
    let dx = pointer.x - grid_origin.x;
    if dx < 0.0 {
        return None;
    }
    Some(((dx / column_width_px).round() as usize).min(column_count - 1))
}

fn column_date(columns: &[Column], column_index: usize, zoom: Zoom) -> Option<NaiveDate> {
    let first = columns.first()?;
    let offset = column_index as i64 * i64::from(zoom.days_per_column());
    Some(add_days(first.start, offset))
}
