//! Display list: the scene reduced to paintable primitives.
//!
//! [`build`] is a pure function of the scene, junction map, UI state, and
//! zoom. It owns every geometric decision about what a floor plan looks like
//! (junction-extended wall bodies, chairs around tables, door swings, window
//! glazing, dimension callouts) so the browser renderer in
//! [`crate::render`] only has to stroke and fill.
//!
//! Order is back to front: dimmed background layer, editable objects by
//! type layer, in-progress previews, then selection chrome.

#[cfg(test)]
#[path = "display_test.rs"]
mod display_test;

use crate::camera::Point;
use crate::config::EditorConfig;
use crate::consts::{CHAIR_GAP, CHAIR_SIZE, HANDLE_RADIUS_PX};
use crate::doc::{
    Alignment, ChairKind, DoorType, FloorObject, ObjectId, ObjectKind, ObjectType, Scene, Shape, Side,
    SwingDirection,
};
use crate::geom::{self, Placement, Segment};
use crate::input::{SelectionRect, UiState};
use crate::junction::{self, JunctionAdjustment, JunctionMap};

/// Distance from a wall face to its dimension line, in world units.
const DIMENSION_OFFSET: f64 = 14.0;

/// Fill/stroke role; the renderer maps roles to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Wall,
    Column,
    Table,
    Bar,
    /// Door/window body; masks the wall underneath.
    Opening,
    /// Door leaves, swing arcs, glazing.
    Fixture,
    Ghost,
    InvalidGhost,
}

/// Body outline in the object's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outline {
    Rect,
    Ellipse,
    /// Flat edge along the local bottom, arc above.
    Semicircle,
}

/// One chair, already in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChairPlacement {
    pub center: Point,
    /// Facing: 0 means the table is below the chair.
    pub rotation: f64,
    pub kind: ChairKind,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Wall body quad: start-left, end-left, end-right, start-right.
    /// Long edges are always stroked; the short end edges only when flagged.
    Wall {
        id: Option<ObjectId>,
        corners: [Point; 4],
        stroke_start: bool,
        stroke_end: bool,
        background: bool,
    },
    Shape {
        id: Option<ObjectId>,
        placement: Placement,
        outline: Outline,
        paint: Paint,
        background: bool,
    },
    Chair {
        placement: Placement,
        kind: ChairKind,
        background: bool,
    },
    Line {
        from: Point,
        to: Point,
        paint: Paint,
        background: bool,
    },
    /// Clockwise arc in world degrees.
    Arc {
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        background: bool,
    },
    Label {
        at: Point,
        text: String,
        background: bool,
    },
    /// Measured length between two points, drawn with end ticks and centered text.
    Dimension {
        from: Point,
        to: Point,
        text: String,
    },
    SelectionOutline {
        corners: [Point; 4],
    },
    Handle {
        at: Point,
        radius: f64,
    },
    Marquee(SelectionRect),
}

/// Build the display list for one frame.
#[must_use]
pub fn build(
    scene: &Scene,
    junctions: &JunctionMap,
    ui: &UiState,
    config: &EditorConfig,
    zoom: f64,
) -> Vec<Primitive> {
    let mut out = Vec::new();

    let background_junctions = junction::resolve_junctions(scene.background());
    let mut background: Vec<&FloorObject> = scene.background().iter().collect();
    background.sort_by_key(|o| o.object_type().layer());
    for obj in background {
        push_object(&mut out, obj, &background_junctions, config, true);
    }

    for obj in scene.sorted_objects() {
        push_object(&mut out, obj, junctions, config, false);
    }

    if let Some(seg) = ui.wall_preview {
        let placement = geom::wall_from_points(seg.start, seg.end, config.default_wall_thickness, Alignment::Center);
        out.push(Primitive::Wall {
            id: None,
            corners: placement.corners(),
            stroke_start: true,
            stroke_end: true,
            background: false,
        });
        out.push(dimension(seg, placement.height));
    }

    if let Some(ghost) = ui.ghost {
        let paint = if ghost.wall_id.is_some() { Paint::Ghost } else { Paint::InvalidGhost };
        out.push(Primitive::Shape {
            id: None,
            placement: ghost.placement,
            outline: Outline::Rect,
            paint,
            background: false,
        });
    }

    for id in &ui.selected_ids {
        if let Some(obj) = scene.get(id) {
            out.push(Primitive::SelectionOutline { corners: obj.placement().corners() });
        }
    }

    let single_wall = match ui.selected_ids.len() {
        1 => ui.selected_id.and_then(|id| scene.get(&id)).filter(|o| o.is_wall()),
        _ => None,
    };
    if let Some(wall) = single_wall {
        if let Some(seg) = wall.wall_segment() {
            let radius = HANDLE_RADIUS_PX / zoom.max(f64::EPSILON);
            out.push(Primitive::Handle { at: seg.start, radius });
            out.push(Primitive::Handle { at: seg.end, radius });
            out.push(dimension(seg, wall.height));
        }
    }

    if let Some(m) = ui.marquee {
        out.push(Primitive::Marquee(m));
    }

    out
}

fn push_object(out: &mut Vec<Primitive>, obj: &FloorObject, junctions: &JunctionMap, config: &EditorConfig, background: bool) {
    let id = Some(obj.id);
    let placement = obj.placement();
    match &obj.kind {
        ObjectKind::Wall { .. } => {
            let adj = junctions.get(&obj.id).copied().unwrap_or_default();
            if let Some(corners) = wall_corners(obj, &adj) {
                out.push(Primitive::Wall {
                    id,
                    corners,
                    stroke_start: !adj.hide_start_stroke,
                    stroke_end: !adj.hide_end_stroke,
                    background,
                });
            }
        }
        ObjectKind::Column { shape } => {
            out.push(Primitive::Shape { id, placement, outline: outline_for(*shape), paint: Paint::Column, background });
        }
        ObjectKind::Table(props) | ObjectKind::Bar(props) => {
            for chair in chair_positions(obj, config.chair_spacing) {
                out.push(Primitive::Chair {
                    placement: Placement::centered(chair.center, CHAIR_SIZE, CHAIR_SIZE, chair.rotation),
                    kind: chair.kind,
                    background,
                });
            }
            let paint = if obj.object_type() == ObjectType::Bar { Paint::Bar } else { Paint::Table };
            out.push(Primitive::Shape { id, placement, outline: outline_for(props.shape), paint, background });

            let mut text = props.label.clone();
            if let Some(pax) = props.current_pax {
                text = format!("{text} ({pax}/{})", props.seats);
            }
            if !text.is_empty() {
                out.push(Primitive::Label { at: obj.center(), text, background });
            }
            if let Some(name) = props.customer_name.as_ref().filter(|n| !n.is_empty()) {
                let at = geom::local_to_world(obj.center(), obj.rotation, Point::new(0.0, placement.height / 4.0));
                out.push(Primitive::Label { at, text: name.clone(), background });
            }
        }
        ObjectKind::Door { door_type, swing_direction, .. } => {
            out.push(Primitive::Shape { id, placement, outline: Outline::Rect, paint: Paint::Opening, background });
            push_door_fixture(out, &placement, *door_type, *swing_direction, background);
        }
        ObjectKind::Window { .. } => {
            out.push(Primitive::Shape { id, placement, outline: Outline::Rect, paint: Paint::Opening, background });
            let (hw, inset) = (placement.width / 2.0, placement.height / 6.0);
            for y in [-inset, inset] {
                out.push(Primitive::Line {
                    from: geom::local_to_world(placement.center(), placement.rotation, Point::new(-hw, y)),
                    to: geom::local_to_world(placement.center(), placement.rotation, Point::new(hw, y)),
                    paint: Paint::Fixture,
                    background,
                });
            }
        }
    }
}

/// Wall body corners with junction extensions applied along the reference line.
#[must_use]
pub fn wall_corners(wall: &FloorObject, adj: &JunctionAdjustment) -> Option<[Point; 4]> {
    let seg = wall.wall_segment()?;
    let alignment = wall.alignment()?;
    let len = seg.length();
    if len <= f64::EPSILON {
        return None;
    }
    let unit = seg.direction().scale(1.0 / len);
    let normal = Point::new(-unit.y, unit.x);
    let offset = geom::alignment_offset(wall.height, alignment);
    let half = wall.height / 2.0;

    let start = seg.start.sub(unit.scale(adj.start_extension));
    let end = seg.end.add(unit.scale(adj.end_extension));
    let left = normal.scale(offset - half);
    let right = normal.scale(offset + half);
    Some([start.add(left), end.add(left), end.add(right), start.add(right)])
}

fn push_door_fixture(
    out: &mut Vec<Primitive>,
    placement: &Placement,
    door_type: DoorType,
    swing: SwingDirection,
    background: bool,
) {
    let c = placement.center();
    let rot = placement.rotation;
    let (hw, hh) = (placement.width / 2.0, placement.height / 2.0);
    let to_world = |x: f64, y: f64| geom::local_to_world(c, rot, Point::new(x, y));

    let mut leaf = |hinge_x: f64, radius: f64, start: f64| {
        let hinge = to_world(hinge_x, -hh);
        out.push(Primitive::Line { from: hinge, to: to_world(hinge_x, -hh - radius), paint: Paint::Fixture, background });
        out.push(Primitive::Arc { center: hinge, radius, start_deg: rot + start, end_deg: rot + start + 90.0, background });
    };

    match (door_type, swing) {
        (DoorType::Single, SwingDirection::Left) => leaf(-hw, placement.width, -90.0),
        (DoorType::Single, SwingDirection::Right) => leaf(hw, placement.width, 180.0),
        (DoorType::Double, _) => {
            leaf(-hw, hw, -90.0);
            leaf(hw, hw, 180.0);
        }
        (DoorType::Sliding, _) => {
            let gap = hh + 3.0;
            out.push(Primitive::Line { from: to_world(-hw, -gap), to: to_world(hw * 0.2, -gap), paint: Paint::Fixture, background });
            out.push(Primitive::Line { from: to_world(-hw * 0.2, gap), to: to_world(hw, gap), paint: Paint::Fixture, background });
        }
    }
}

fn dimension(seg: Segment, thickness: f64) -> Primitive {
    let len = seg.length();
    let normal = if len > f64::EPSILON {
        let u = seg.direction().scale(1.0 / len);
        Point::new(u.y, -u.x)
    } else {
        Point::new(0.0, -1.0)
    };
    let shift = normal.scale(thickness / 2.0 + DIMENSION_OFFSET);
    Primitive::Dimension {
        from: seg.start.add(shift),
        to: seg.end.add(shift),
        text: format!("{len:.0}"),
    }
}

fn outline_for(shape: Shape) -> Outline {
    match shape {
        Shape::Square | Shape::Rectangular => Outline::Rect,
        Shape::Circular => Outline::Ellipse,
        Shape::Semicircle => Outline::Semicircle,
    }
}

/// Chairs per side: one per `spacing` of side length, at least one.
#[must_use]
pub fn chairs_for_length(length: f64, spacing: f64) -> usize {
    if spacing <= 0.0 || !length.is_finite() {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (length / spacing).floor().max(0.0) as usize;
    n.max(1)
}

/// Chair positions around a table or bar, honoring per-side seating.
///
/// Rectangular tables spread chairs evenly along each enabled edge. Round
/// tables place them around the rim and drop those in a disabled side's
/// quadrant. Semicircles seat the arc like a round table and the flat
/// bottom edge like a rectangle.
#[must_use]
pub fn chair_positions(obj: &FloorObject, spacing: f64) -> Vec<ChairPlacement> {
    let Some(props) = obj.table_props() else {
        return Vec::new();
    };
    let (hw, hh) = (obj.width / 2.0, obj.height / 2.0);
    let reach = CHAIR_GAP + CHAIR_SIZE / 2.0;
    let mut local: Vec<(Point, f64, Side)> = Vec::new();

    let edge = |side: Side, out: &mut Vec<(Point, f64, Side)>| {
        let (len, rot) = match side {
            Side::Top => (obj.width, 0.0),
            Side::Right => (obj.height, 90.0),
            Side::Bottom => (obj.width, 180.0),
            Side::Left => (obj.height, 270.0),
        };
        let n = chairs_for_length(len, spacing);
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let along = -len / 2.0 + len * (i as f64 + 0.5) / n as f64;
            let p = match side {
                Side::Top => Point::new(along, -hh - reach),
                Side::Right => Point::new(hw + reach, along),
                Side::Bottom => Point::new(along, hh + reach),
                Side::Left => Point::new(-hw - reach, along),
            };
            out.push((p, rot, side));
        }
    };

    match props.shape {
        Shape::Square | Shape::Rectangular => {
            for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
                edge(side, &mut local);
            }
        }
        Shape::Circular => {
            let (rx, ry) = (hw + reach, hh + reach);
            let n = chairs_for_length(std::f64::consts::PI * (hw + hh), spacing);
            for i in 0..n {
                #[allow(clippy::cast_precision_loss)]
                let theta = -90.0 + 360.0 * i as f64 / n as f64;
                push_rim(&mut local, theta, rx, ry, 0.0);
            }
        }
        Shape::Semicircle => {
            let (rx, ry) = (hw + reach, 2.0 * hh + reach);
            let n = chairs_for_length(std::f64::consts::PI * (hw + 2.0 * hh) / 2.0, spacing);
            for i in 0..n {
                #[allow(clippy::cast_precision_loss)]
                let theta = -180.0 + 180.0 * (i as f64 + 0.5) / n as f64;
                push_rim(&mut local, theta, rx, ry, hh);
            }
            edge(Side::Bottom, &mut local);
        }
    }

    let center = obj.center();
    local
        .into_iter()
        .filter_map(|(p, rot, side)| {
            let seat = props.seating.side(side);
            seat.enabled.then(|| ChairPlacement {
                center: geom::local_to_world(center, obj.rotation, p),
                rotation: geom::normalize_degrees(obj.rotation + rot),
                kind: seat.kind,
                side,
            })
        })
        .collect()
}

fn push_rim(out: &mut Vec<(Point, f64, Side)>, theta_deg: f64, rx: f64, ry: f64, cy: f64) {
    let t = theta_deg.to_radians();
    let p = Point::new(rx * t.cos(), cy + ry * t.sin());
    out.push((p, theta_deg + 90.0, quadrant_side(theta_deg)));
}

/// Which table side a rim angle (0° = right, clockwise) belongs to.
fn quadrant_side(theta_deg: f64) -> Side {
    let a = geom::normalize_degrees(theta_deg + 45.0);
    if a < 90.0 {
        Side::Right
    } else if a < 180.0 {
        Side::Bottom
    } else if a < 270.0 {
        Side::Left
    } else {
        Side::Top
    }
}
