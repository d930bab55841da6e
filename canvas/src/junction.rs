//! Wall junction resolution.
//!
//! Walls are drawn as independent rectangles, so two walls meeting at a corner
//! would otherwise show a notch and a stroke line across the seam. For every
//! pair of walls whose endpoints coincide (within [`JUNCTION_EPSILON`]) this
//! module works out how far each wall end must be extended and whether the
//! short end stroke should be suppressed.
//!
//! - Orthogonal joins (≈90°) extend each end by half the *other* wall's
//!   thickness so the bodies fill the corner square.
//! - Collinear joins (≈0°/180°) extend each end by [`COLLINEAR_OVERLAP`].
//!
//! Multiple detections at the same end combine with `max`, never by summing.
//! Pairs are checked exhaustively (O(n²)), which is fine for floor plans of a
//! few hundred walls. Results are recomputed whenever wall geometry changes.

#[cfg(test)]
#[path = "junction_test.rs"]
mod junction_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::consts::{COLLINEAR_OVERLAP, JUNCTION_ANGLE_TOLERANCE_DEG, JUNCTION_EPSILON};
use crate::doc::{FloorObject, ObjectId};

/// Which end of a wall's reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallEnd {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionKind {
    /// L-corner.
    Orthogonal,
    /// Straight run.
    Collinear,
}

/// One detected connection between two wall ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Junction {
    pub a: ObjectId,
    pub a_end: WallEnd,
    pub b: ObjectId,
    pub b_end: WallEnd,
    pub kind: JunctionKind,
    /// Shared location (midpoint of the two endpoints).
    pub at: Point,
}

/// Rendering adjustments for one wall.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JunctionAdjustment {
    pub start_extension: f64,
    pub end_extension: f64,
    pub hide_start_stroke: bool,
    pub hide_end_stroke: bool,
}

impl JunctionAdjustment {
    fn extend(&mut self, end: WallEnd, amount: f64) {
        match end {
            WallEnd::Start => {
                self.start_extension = self.start_extension.max(amount);
                self.hide_start_stroke = true;
            }
            WallEnd::End => {
                self.end_extension = self.end_extension.max(amount);
                self.hide_end_stroke = true;
            }
        }
    }
}

/// Per-wall adjustments keyed by wall id. Walls without junctions are absent.
pub type JunctionMap = HashMap<ObjectId, JunctionAdjustment>;

struct WallInfo {
    id: ObjectId,
    start: Point,
    end: Point,
    rotation: f64,
}

impl WallInfo {
    fn point(&self, end: WallEnd) -> Point {
        match end {
            WallEnd::Start => self.start,
            WallEnd::End => self.end,
        }
    }
}

/// Classify the angle between two wall rotations.
#[must_use]
pub fn classify(rotation_a: f64, rotation_b: f64) -> Option<JunctionKind> {
    let diff = (rotation_a - rotation_b).abs().rem_euclid(180.0);
    if (diff - 90.0).abs() <= JUNCTION_ANGLE_TOLERANCE_DEG {
        Some(JunctionKind::Orthogonal)
    } else if diff <= JUNCTION_ANGLE_TOLERANCE_DEG || diff >= 180.0 - JUNCTION_ANGLE_TOLERANCE_DEG {
        Some(JunctionKind::Collinear)
    } else {
        None
    }
}

/// Every connection between wall ends. Non-walls in `objects` are ignored.
#[must_use]
pub fn detect_junctions<'a>(objects: impl IntoIterator<Item = &'a FloorObject>) -> Vec<Junction> {
    let walls: Vec<WallInfo> = objects
        .into_iter()
        .filter_map(|o| {
            o.wall_segment().map(|seg| WallInfo {
                id: o.id,
                start: seg.start,
                end: seg.end,
                rotation: o.rotation,
            })
        })
        .collect();

    let mut out = Vec::new();
    for (i, a) in walls.iter().enumerate() {
        for b in &walls[i + 1..] {
            let Some(kind) = classify(a.rotation, b.rotation) else {
                continue;
            };
            for a_end in [WallEnd::Start, WallEnd::End] {
                for b_end in [WallEnd::Start, WallEnd::End] {
                    let (pa, pb) = (a.point(a_end), b.point(b_end));
                    if pa.distance(pb) < JUNCTION_EPSILON {
                        out.push(Junction { a: a.id, a_end, b: b.id, b_end, kind, at: pa.lerp(pb, 0.5) });
                    }
                }
            }
        }
    }
    out
}

/// Per-wall extension and stroke suppression for all walls in `objects`.
#[must_use]
pub fn resolve_junctions<'a>(objects: impl IntoIterator<Item = &'a FloorObject>) -> JunctionMap {
    let walls: Vec<&FloorObject> = objects.into_iter().filter(|o| o.is_wall()).collect();
    let thickness: HashMap<ObjectId, f64> = walls.iter().map(|w| (w.id, w.height)).collect();

    let mut map = JunctionMap::new();
    for j in detect_junctions(walls.iter().copied()) {
        let (a_amount, b_amount) = match j.kind {
            JunctionKind::Orthogonal => (
                thickness.get(&j.b).copied().unwrap_or(0.0) / 2.0,
                thickness.get(&j.a).copied().unwrap_or(0.0) / 2.0,
            ),
            JunctionKind::Collinear => (COLLINEAR_OVERLAP, COLLINEAR_OVERLAP),
        };
        map.entry(j.a).or_default().extend(j.a_end, a_amount);
        map.entry(j.b).or_default().extend(j.b_end, b_amount);
    }
    map
}
