#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::doc::{Alignment, FloorObject};

fn wall(x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64) -> FloorObject {
    FloorObject::wall(Point::new(x0, y0), Point::new(x1, y1), thickness, Alignment::Center)
}

// =============================================================
// classify
// =============================================================

#[test]
fn classify_right_angle() {
    assert_eq!(classify(0.0, 90.0), Some(JunctionKind::Orthogonal));
    assert_eq!(classify(0.0, -90.0), Some(JunctionKind::Orthogonal));
    assert_eq!(classify(10.0, 104.0), Some(JunctionKind::Orthogonal));
}

#[test]
fn classify_straight_run() {
    assert_eq!(classify(0.0, 0.0), Some(JunctionKind::Collinear));
    assert_eq!(classify(0.0, 180.0), Some(JunctionKind::Collinear));
    assert_eq!(classify(0.0, 177.0), Some(JunctionKind::Collinear));
    assert_eq!(classify(-90.0, 90.0), Some(JunctionKind::Collinear));
}

#[test]
fn classify_oblique_is_none() {
    assert_eq!(classify(0.0, 45.0), None);
    assert_eq!(classify(0.0, 96.0), None);
}

// =============================================================
// resolve_junctions
// =============================================================

#[test]
fn l_corner_extends_both_walls_by_half_other_thickness() {
    let a = wall(0.0, 0.0, 300.0, 0.0, 15.0);
    let b = wall(300.0, 0.0, 300.0, 300.0, 15.0);
    let map = resolve_junctions([&a, &b]);

    let adj_a = map[&a.id];
    assert_eq!(adj_a.end_extension, 7.5);
    assert!(adj_a.hide_end_stroke);
    assert_eq!(adj_a.start_extension, 0.0);
    assert!(!adj_a.hide_start_stroke);

    let adj_b = map[&b.id];
    assert_eq!(adj_b.start_extension, 7.5);
    assert!(adj_b.hide_start_stroke);
    assert!(!adj_b.hide_end_stroke);
}

#[test]
fn l_corner_uses_other_wall_thickness() {
    let thin = wall(0.0, 0.0, 200.0, 0.0, 10.0);
    let thick = wall(200.0, 0.0, 200.0, 200.0, 30.0);
    let map = resolve_junctions([&thin, &thick]);
    assert_eq!(map[&thin.id].end_extension, 15.0);
    assert_eq!(map[&thick.id].start_extension, 5.0);
}

#[test]
fn collinear_run_gets_small_overlap() {
    let a = wall(0.0, 0.0, 100.0, 0.0, 15.0);
    let b = wall(100.0, 0.0, 250.0, 0.0, 15.0);
    let map = resolve_junctions([&a, &b]);
    assert_eq!(map[&a.id].end_extension, COLLINEAR_OVERLAP);
    assert_eq!(map[&b.id].start_extension, COLLINEAR_OVERLAP);
    assert!(map[&a.id].hide_end_stroke);
    assert!(map[&b.id].hide_start_stroke);
}

#[test]
fn near_miss_within_epsilon_still_joins() {
    let a = wall(0.0, 0.0, 100.0, 0.0, 15.0);
    let b = wall(103.0, 0.0, 103.0, 100.0, 15.0);
    let map = resolve_junctions([&a, &b]);
    assert_eq!(map[&a.id].end_extension, 7.5);
}

#[test]
fn distant_ends_do_not_join() {
    let a = wall(0.0, 0.0, 100.0, 0.0, 15.0);
    let b = wall(110.0, 0.0, 110.0, 100.0, 15.0);
    assert!(resolve_junctions([&a, &b]).is_empty());
}

#[test]
fn oblique_meeting_is_ignored() {
    let a = wall(0.0, 0.0, 100.0, 0.0, 15.0);
    let b = wall(100.0, 0.0, 200.0, 100.0, 15.0);
    assert!(detect_junctions([&a, &b]).is_empty());
}

#[test]
fn multiple_joins_at_one_end_take_max() {
    // T-ish: wall a's end meets a thin perpendicular wall and a thick one.
    let a = wall(0.0, 0.0, 100.0, 0.0, 15.0);
    let up = wall(100.0, 0.0, 100.0, -100.0, 10.0);
    let down = wall(100.0, 0.0, 100.0, 100.0, 30.0);
    let map = resolve_junctions([&a, &up, &down]);
    assert_eq!(map[&a.id].end_extension, 15.0);
}

#[test]
fn rectangle_room_every_corner_joined() {
    let walls = [
        wall(0.0, 0.0, 400.0, 0.0, 15.0),
        wall(400.0, 0.0, 400.0, 300.0, 15.0),
        wall(400.0, 300.0, 0.0, 300.0, 15.0),
        wall(0.0, 300.0, 0.0, 0.0, 15.0),
    ];
    let junctions = detect_junctions(walls.iter());
    assert_eq!(junctions.len(), 4);
    assert!(junctions.iter().all(|j| j.kind == JunctionKind::Orthogonal));

    let map = resolve_junctions(walls.iter());
    for w in &walls {
        let adj = map[&w.id];
        assert_eq!(adj.start_extension, 7.5);
        assert_eq!(adj.end_extension, 7.5);
        assert!(adj.hide_start_stroke && adj.hide_end_stroke);
    }
}

#[test]
fn junction_reports_shared_point() {
    let a = wall(0.0, 0.0, 300.0, 0.0, 15.0);
    let b = wall(300.0, 0.0, 300.0, 300.0, 15.0);
    let found = detect_junctions([&a, &b]);
    assert_eq!(found.len(), 1);
    let j = found[0];
    assert_eq!((j.a, j.a_end, j.b, j.b_end), (a.id, WallEnd::End, b.id, WallEnd::Start));
    assert!(j.at.distance(Point::new(300.0, 0.0)) < 1e-9);
}

#[test]
fn non_walls_are_ignored() {
    let a = wall(0.0, 0.0, 300.0, 0.0, 15.0);
    let column = FloorObject::new(
        crate::geom::Placement::centered(Point::new(300.0, 0.0), 30.0, 30.0, 0.0),
        crate::doc::ObjectKind::Column { shape: crate::doc::Shape::Square },
    );
    assert!(resolve_junctions([&a, &column]).is_empty());
}
