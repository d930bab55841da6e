#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{FloorObject, ObjectId, ObjectKind, Scene, Shape};
use crate::geom::Bounds;
use crate::junction::WallEnd;

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    WallHandle(WallEnd),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Test which object (if any) is under `world_pt`, checking the selected wall's handles first.
///
/// Only editable objects are considered; background objects are never hit.
#[must_use]
pub fn hit_test(world_pt: Point, scene: &Scene, camera: &Camera, selected_id: Option<ObjectId>) -> Option<Hit> {
    let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);

    if let Some(wall) = selected_id.and_then(|id| scene.get(&id)) {
        if let Some(end) = wall_handle_at(world_pt, wall, slop) {
            return Some(Hit { object_id: wall.id, part: HitPart::WallHandle(end) });
        }
    }

    scene
        .sorted_objects()
        .into_iter()
        .rev()
        .find(|obj| body_contains(obj, world_pt, slop))
        .map(|obj| Hit { object_id: obj.id, part: HitPart::Body })
}

/// Which endpoint handle of `wall` lies within `slop` of `world_pt`, if any.
#[must_use]
pub fn wall_handle_at(world_pt: Point, wall: &FloorObject, slop: f64) -> Option<WallEnd> {
    let seg = wall.wall_segment()?;
    let d_start = world_pt.distance(seg.start);
    let d_end = world_pt.distance(seg.end);
    if d_start > slop && d_end > slop {
        return None;
    }
    Some(if d_start <= d_end { WallEnd::Start } else { WallEnd::End })
}

/// Whether `world_pt` lies on the object's body. Walls get `slop` of extra
/// thickness so thin walls stay clickable.
#[must_use]
pub fn body_contains(obj: &FloorObject, world_pt: Point, slop: f64) -> bool {
    let placement = obj.placement();
    let local = placement.to_local(world_pt);
    let (hw, hh) = (placement.width / 2.0, placement.height / 2.0);

    let shape = match &obj.kind {
        ObjectKind::Column { shape } => *shape,
        ObjectKind::Table(p) | ObjectKind::Bar(p) => p.shape,
        _ => Shape::Square,
    };

    match (&obj.kind, shape) {
        (ObjectKind::Wall { .. }, _) => local.x.abs() <= hw && local.y.abs() <= hh + slop,
        (_, Shape::Circular) => {
            if hw <= 0.0 || hh <= 0.0 {
                return false;
            }
            (local.x / hw).powi(2) + (local.y / hh).powi(2) <= 1.0
        }
        (_, Shape::Semicircle) => {
            if hw <= 0.0 || hh <= 0.0 || local.y > hh {
                return false;
            }
            // Flat edge along the bottom; the arc bulges upward with radius (hw, 2hh).
            (local.x / hw).powi(2) + ((local.y - hh) / (2.0 * hh)).powi(2) <= 1.0
        }
        _ => local.x.abs() <= hw && local.y.abs() <= hh,
    }
}

/// Objects whose center falls inside `rect`, in insertion order.
#[must_use]
pub fn centroids_within(scene: &Scene, rect: Bounds) -> Vec<ObjectId> {
    scene
        .objects()
        .iter()
        .filter(|o| rect.contains(o.center()))
        .map(|o| o.id)
        .collect()
}
