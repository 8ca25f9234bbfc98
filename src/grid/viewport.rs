//! Visible window of the grid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::drag::Point;
use crate::layout::Geometry;
use crate::timeline::{segment, Segmentation, Zoom};

/// Date range, zoom, and pixel geometry currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// First visible day.
    pub from: NaiveDate,
    /// Day after the last visible day.
    pub to: NaiveDate,
    /// Column granularity.
    pub zoom: Zoom,
    /// Column width (px).
    pub column_width_px: f64,
    /// Lane height (px).
    pub lane_height_px: f64,
    /// Top-left corner of the grid surface in host coordinates.
    pub grid_origin: Point,
}

impl Viewport {
    /// Creates a viewport using the configured zoom and sizes.
    pub fn from_config(config: &GridConfig, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            zoom: config.zoom,
            column_width_px: config.column_width_px,
            lane_height_px: config.lane_height_px,
            grid_origin: Point::default(),
        }
    }

    /// Sets the grid origin.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.grid_origin = origin;
        self
    }

    /// Columns and month headers for the window.
    pub fn segmentation(&self) -> Segmentation {
        segment(self.from, self.to, self.zoom)
    }

    /// Pixel sizes for layout.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            column_width_px: self.column_width_px,
            lane_height_px: self.lane_height_px,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = GridConfig {
            zoom: Zoom::Week,
            column_width_px: 40.0,
            ..GridConfig::default()
        };
        let from = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let vp = Viewport::from_config(&config, from, to).with_origin(Point::new(100.0, 20.0));

        assert_eq!(vp.segmentation().columns.len(), 4);
        assert!((vp.geometry().column_width_px - 40.0).abs() < 1e-10);
        assert!((vp.grid_origin.x - 100.0).abs() < 1e-10);
    }
}
