//! Host configuration loaded from `FLOORPLAN_*` environment variables.
//!
//! Missing or unparseable values fall back to defaults; the editor never
//! refuses to start over a bad tunable.

use floorplan_canvas::config::EditorConfig;

pub const DEFAULT_AUTOSAVE_MS: u64 = 800;
pub const DEFAULT_AUTOSAVE_QUEUE: usize = 64;

/// Everything a host needs to open floor sessions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    /// Tunables handed to each editor core.
    pub editor: EditorConfig,
    /// Quiet period after the last edit before the auto-save worker writes.
    pub autosave_ms: u64,
    /// Bounded capacity of the auto-save queue.
    pub autosave_queue: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            autosave_ms: DEFAULT_AUTOSAVE_MS,
            autosave_queue: DEFAULT_AUTOSAVE_QUEUE,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes the process environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = EditorConfig::default();
        let get = |key: &str, default: f64| parse_or(lookup(key), default);
        let editor = EditorConfig {
            grid_size: get("FLOORPLAN_GRID_SIZE", d.grid_size),
            wall_snap_threshold: get("FLOORPLAN_WALL_SNAP_THRESHOLD", d.wall_snap_threshold),
            chair_spacing: get("FLOORPLAN_CHAIR_SPACING", d.chair_spacing),
            default_table_size: get("FLOORPLAN_TABLE_SIZE", d.default_table_size),
            default_wall_thickness: get("FLOORPLAN_WALL_THICKNESS", d.default_wall_thickness),
            default_opening_width: get("FLOORPLAN_OPENING_WIDTH", d.default_opening_width),
            default_column_size: get("FLOORPLAN_COLUMN_SIZE", d.default_column_size),
            fit_padding: get("FLOORPLAN_FIT_PADDING", d.fit_padding),
            fit_max_zoom: get("FLOORPLAN_FIT_MAX_ZOOM", d.fit_max_zoom),
        }
        .sanitized();

        Self {
            editor,
            autosave_ms: parse_or(lookup("FLOORPLAN_AUTOSAVE_MS"), DEFAULT_AUTOSAVE_MS),
            autosave_queue: parse_or(lookup("FLOORPLAN_AUTOSAVE_QUEUE"), DEFAULT_AUTOSAVE_QUEUE).max(1),
        }
    }
}

/// Parse `raw`, falling back to `default` when missing or invalid.
fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
