//! Editor tuning values injected by the host.
//!
//! Every field has a sane default so the engine works without any host
//! configuration at all.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: f64 = 10.0;
pub const DEFAULT_WALL_SNAP_THRESHOLD: f64 = 40.0;
pub const DEFAULT_CHAIR_SPACING: f64 = 60.0;
pub const DEFAULT_TABLE_SIZE: f64 = 70.0;
pub const DEFAULT_WALL_THICKNESS: f64 = 15.0;
pub const DEFAULT_OPENING_WIDTH: f64 = 100.0;
pub const DEFAULT_COLUMN_SIZE: f64 = 30.0;
pub const DEFAULT_FIT_PADDING: f64 = 50.0;
pub const DEFAULT_FIT_MAX_ZOOM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Lattice spacing for grid snapping, in world units.
    pub grid_size: f64,
    /// Farthest a pointer may be from a wall and still snap a door or window onto it.
    pub wall_snap_threshold: f64,
    /// Nominal distance between chairs along a table side.
    pub chair_spacing: f64,
    /// Edge length of a freshly placed table.
    pub default_table_size: f64,
    /// Thickness of a freshly drawn wall.
    pub default_wall_thickness: f64,
    /// Width of a freshly placed door or window.
    pub default_opening_width: f64,
    /// Edge length of a freshly placed column.
    pub default_column_size: f64,
    /// World-space margin kept around content by fit-to-content.
    pub fit_padding: f64,
    /// Fit-to-content never zooms in past this factor.
    pub fit_max_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            wall_snap_threshold: DEFAULT_WALL_SNAP_THRESHOLD,
            chair_spacing: DEFAULT_CHAIR_SPACING,
            default_table_size: DEFAULT_TABLE_SIZE,
            default_wall_thickness: DEFAULT_WALL_THICKNESS,
            default_opening_width: DEFAULT_OPENING_WIDTH,
            default_column_size: DEFAULT_COLUMN_SIZE,
            fit_padding: DEFAULT_FIT_PADDING,
            fit_max_zoom: DEFAULT_FIT_MAX_ZOOM,
        }
    }
}

impl EditorConfig {
    /// Replace non-finite or non-positive values with their defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pick = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            grid_size: pick(self.grid_size, d.grid_size),
            wall_snap_threshold: pick(self.wall_snap_threshold, d.wall_snap_threshold),
            chair_spacing: pick(self.chair_spacing, d.chair_spacing),
            default_table_size: pick(self.default_table_size, d.default_table_size),
            default_wall_thickness: pick(self.default_wall_thickness, d.default_wall_thickness),
            default_opening_width: pick(self.default_opening_width, d.default_opening_width),
            default_column_size: pick(self.default_column_size, d.default_column_size),
            fit_padding: if self.fit_padding.is_finite() && self.fit_padding >= 0.0 {
                self.fit_padding
            } else {
                d.fit_padding
            },
            fit_max_zoom: pick(self.fit_max_zoom, d.fit_max_zoom),
        }
    }
}
