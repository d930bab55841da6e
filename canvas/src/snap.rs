//! Snapping: a uniform grid for raw pointer coordinates, and wall attachment
//! for doors and windows.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::camera::Point;
use crate::doc::{FloorObject, ObjectId};
use crate::geom;

/// Snap a scalar to the nearest multiple of `grid`. A non-positive grid disables snapping.
#[must_use]
pub fn snap(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 || !grid.is_finite() {
        return v;
    }
    (v / grid).round() * grid
}

/// Snap both coordinates of a point to the grid.
#[must_use]
pub fn snap_point(p: Point, grid: f64) -> Point {
    Point::new(snap(p.x, grid), snap(p.y, grid))
}

/// Where an object lands when snapped onto a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSnap {
    /// Projected center on the wall's reference line.
    pub point: Point,
    /// Fractional position along the reference line.
    pub t: f64,
    /// Host wall rotation, which the attached object adopts.
    pub rotation: f64,
    pub wall_id: ObjectId,
    /// Host wall thickness.
    pub thickness: f64,
    /// Distance from the candidate point to `point`.
    pub distance: f64,
}

/// Snap onto one specific wall with no distance limit.
///
/// Returns `None` only if `wall` is not a wall.
#[must_use]
pub fn snap_to_wall(candidate: Point, wall: &FloorObject, object_width: Option<f64>) -> Option<WallSnap> {
    let seg = wall.wall_segment()?;
    let proj = geom::project_point_onto_wall(candidate, &seg, object_width);
    Some(WallSnap {
        point: proj.point,
        t: proj.t,
        rotation: wall.rotation,
        wall_id: wall.id,
        thickness: wall.height,
        distance: candidate.distance(proj.point),
    })
}

/// Snap onto the nearest wall within `threshold` of `candidate`.
///
/// Non-walls in `objects` are skipped. Ties go to the earlier wall.
#[must_use]
pub fn snap_to_walls<'a>(
    candidate: Point,
    objects: impl IntoIterator<Item = &'a FloorObject>,
    object_width: Option<f64>,
    threshold: f64,
) -> Option<WallSnap> {
    objects
        .into_iter()
        .filter_map(|o| snap_to_wall(candidate, o, object_width))
        .filter(|s| s.distance <= threshold)
        .fold(None, |best: Option<WallSnap>, s| match best {
            Some(b) if b.distance <= s.distance => Some(b),
            _ => Some(s),
        })
}
