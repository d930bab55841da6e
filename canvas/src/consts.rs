//! Shared numeric constants for the canvas crate.

// ── Walls ───────────────────────────────────────────────────────

/// Shortest reference line a wall may have, in world units.
pub const MIN_WALL_LENGTH: f64 = 20.0;

/// Two wall endpoints closer than this are treated as one junction.
pub const JUNCTION_EPSILON: f64 = 5.0;

/// Angular tolerance (degrees) when classifying a junction.
pub const JUNCTION_ANGLE_TOLERANCE_DEG: f64 = 5.0;

/// Overlap added to collinear wall ends so no hairline gap shows between them.
pub const COLLINEAR_OVERLAP: f64 = 2.0;

// ── Camera ──────────────────────────────────────────────────────

/// Lower zoom limit.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom limit.
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom factor applied per wheel notch (100 px of delta).
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for handles and thin walls.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Rendering ───────────────────────────────────────────────────

/// Chair footprint edge length in world units.
pub const CHAIR_SIZE: f64 = 18.0;

/// Gap between a table edge and its chairs, in world units.
pub const CHAIR_GAP: f64 = 4.0;
