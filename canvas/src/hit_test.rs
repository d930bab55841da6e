#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::doc::{Alignment, DoorType, SwingDirection, TableProps};
use crate::geom::Placement;

fn wall(x0: f64, y0: f64, x1: f64, y1: f64) -> FloorObject {
    FloorObject::wall(Point::new(x0, y0), Point::new(x1, y1), 15.0, Alignment::Center)
}

fn table(cx: f64, cy: f64, shape: Shape) -> FloorObject {
    FloorObject::new(
        Placement::centered(Point::new(cx, cy), 80.0, 40.0, 0.0),
        ObjectKind::Table(TableProps { shape, ..Default::default() }),
    )
}

fn scene_with(objects: Vec<FloorObject>) -> Scene {
    let mut scene = Scene::new();
    scene.load_snapshot(objects);
    scene
}

// =============================================================
// body_contains
// =============================================================

#[test]
fn rect_body_contains_interior_only() {
    let t = table(0.0, 0.0, Shape::Rectangular);
    assert!(body_contains(&t, Point::new(39.0, 19.0), 0.0));
    assert!(!body_contains(&t, Point::new(41.0, 0.0), 0.0));
}

#[test]
fn rotated_rect_uses_local_frame() {
    let mut t = table(0.0, 0.0, Shape::Rectangular);
    t.rotation = 90.0;
    assert!(body_contains(&t, Point::new(0.0, 35.0), 0.0));
    assert!(!body_contains(&t, Point::new(35.0, 0.0), 0.0));
}

#[test]
fn circular_body_excludes_corners() {
    let t = table(0.0, 0.0, Shape::Circular);
    assert!(body_contains(&t, Point::new(0.0, 0.0), 0.0));
    assert!(!body_contains(&t, Point::new(38.0, 18.0), 0.0));
}

#[test]
fn semicircle_body_is_upper_arc() {
    let t = table(0.0, 0.0, Shape::Semicircle);
    // Flat edge at y = 20; arc peaks at y = -20.
    assert!(body_contains(&t, Point::new(0.0, -15.0), 0.0));
    assert!(body_contains(&t, Point::new(35.0, 18.0), 0.0));
    assert!(!body_contains(&t, Point::new(38.0, -18.0), 0.0));
}

#[test]
fn wall_body_gets_thickness_slop() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    assert!(!body_contains(&w, Point::new(150.0, 12.0), 0.0));
    assert!(body_contains(&w, Point::new(150.0, 12.0), 8.0));
}

// =============================================================
// wall_handle_at
// =============================================================

#[test]
fn handle_hit_prefers_closer_end() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    assert_eq!(wall_handle_at(Point::new(3.0, 2.0), &w, 8.0), Some(WallEnd::Start));
    assert_eq!(wall_handle_at(Point::new(298.0, -1.0), &w, 8.0), Some(WallEnd::End));
    assert_eq!(wall_handle_at(Point::new(150.0, 0.0), &w, 8.0), None);
}

#[test]
fn short_wall_handles_resolve_by_distance() {
    let w = wall(0.0, 0.0, 20.0, 0.0);
    assert_eq!(wall_handle_at(Point::new(14.0, 0.0), &w, 8.0), Some(WallEnd::End));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_test_empty_space_is_none() {
    let scene = scene_with(vec![table(0.0, 0.0, Shape::Square)]);
    assert!(hit_test(Point::new(500.0, 500.0), &scene, &Camera::default(), None).is_none());
}

#[test]
fn hit_test_topmost_layer_wins() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let door = FloorObject::new(
        Placement::centered(Point::new(150.0, 0.0), 100.0, 15.0, 0.0),
        ObjectKind::Door {
            door_type: DoorType::Single,
            swing_direction: SwingDirection::Left,
            attached_wall_id: Some(w.id),
        },
    );
    let scene = scene_with(vec![door.clone(), w.clone()]);
    let hit = hit_test(Point::new(150.0, 0.0), &scene, &Camera::default(), None).unwrap();
    assert_eq!(hit, Hit { object_id: door.id, part: HitPart::Body });

    let hit = hit_test(Point::new(250.0, 0.0), &scene, &Camera::default(), None).unwrap();
    assert_eq!(hit.object_id, w.id);
}

#[test]
fn handles_only_for_selected_wall() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let scene = scene_with(vec![w.clone()]);
    let cam = Camera::default();

    let unselected = hit_test(Point::new(299.0, 0.0), &scene, &cam, None).unwrap();
    assert_eq!(unselected.part, HitPart::Body);

    let selected = hit_test(Point::new(299.0, 0.0), &scene, &cam, Some(w.id)).unwrap();
    assert_eq!(selected.part, HitPart::WallHandle(WallEnd::End));
}

#[test]
fn handle_slop_scales_with_zoom() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let scene = scene_with(vec![w.clone()]);
    let zoomed = Camera { x: 0.0, y: 0.0, zoom: 4.0 };
    // 8 px at 4x zoom is 2 world units.
    let miss = hit_test(Point::new(305.0, 0.0), &scene, &zoomed, Some(w.id));
    assert!(miss.is_none());
    let hit = hit_test(Point::new(301.5, 0.0), &scene, &zoomed, Some(w.id)).unwrap();
    assert_eq!(hit.part, HitPart::WallHandle(WallEnd::End));
}

#[test]
fn background_is_never_hit() {
    let mut scene = Scene::new();
    scene.load_background(vec![table(0.0, 0.0, Shape::Square)]);
    assert!(hit_test(Point::new(0.0, 0.0), &scene, &Camera::default(), None).is_none());
}

// =============================================================
// centroids_within
// =============================================================

#[test]
fn marquee_selects_by_center() {
    let inside = table(50.0, 50.0, Shape::Square);
    let straddling = table(110.0, 50.0, Shape::Square);
    let scene = scene_with(vec![inside.clone(), straddling]);
    let rect = Bounds { min_x: 0.0, min_y: 0.0, max_x: 100.0, max_y: 100.0 };
    assert_eq!(centroids_within(&scene, rect), vec![inside.id]);
}
