#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

fn wall(x0: f64, y0: f64, x1: f64, y1: f64) -> FloorObject {
    FloorObject::wall(Point::new(x0, y0), Point::new(x1, y1), 15.0, Alignment::Center)
}

fn door_on(wall: &FloorObject, cx: f64, cy: f64) -> FloorObject {
    FloorObject::new(
        Placement::centered(Point::new(cx, cy), 100.0, wall.height, wall.rotation),
        ObjectKind::Door {
            door_type: DoorType::Single,
            swing_direction: SwingDirection::Left,
            attached_wall_id: Some(wall.id),
        },
    )
}

fn table_at(cx: f64, cy: f64) -> FloorObject {
    FloorObject::new(
        Placement::centered(Point::new(cx, cy), 70.0, 70.0, 0.0),
        ObjectKind::Table(TableProps { label: "T1".into(), seats: 4, ..Default::default() }),
    )
}

fn column_at(cx: f64, cy: f64) -> FloorObject {
    FloorObject::new(
        Placement::centered(Point::new(cx, cy), 30.0, 30.0, 0.0),
        ObjectKind::Column { shape: Shape::Circular },
    )
}

// =============================================================
// Serde
// =============================================================

#[test]
fn wall_serializes_flat_with_type_tag() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let v = serde_json::to_value(&w).unwrap();
    assert_eq!(v["type"], "wall");
    assert_eq!(v["alignment"], "center");
    assert_eq!(v["x"], 0.0);
    assert_eq!(v["y"], -7.5);
    assert_eq!(v["width"], 300.0);
}

#[test]
fn door_uses_camel_case_fields() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let d = door_on(&w, 150.0, 0.0);
    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(v["type"], "door");
    assert_eq!(v["doorType"], "single");
    assert_eq!(v["swingDirection"], "left");
    assert_eq!(v["attachedWallId"], json!(w.id.to_string()));
}

#[test]
fn table_round_trips_through_json() {
    let mut t = table_at(100.0, 100.0);
    if let Some(p) = t.table_props_mut() {
        p.customer_name = Some("Ada".into());
        p.current_pax = Some(3);
        p.seating.set_side(Side::Left, SeatSide { enabled: false, kind: ChairKind::Wheelchair });
    }
    let text = serde_json::to_string(&t).unwrap();
    assert!(text.contains("\"customerName\":\"Ada\""));
    let back: FloorObject = serde_json::from_str(&text).unwrap();
    assert_eq!(back, t);
}

#[test]
fn deserialize_fills_defaults() {
    let id = uuid::Uuid::new_v4();
    let v = json!({ "id": id, "type": "table", "x": 0, "y": 0, "width": 70, "height": 70 });
    let t: FloorObject = serde_json::from_value(v).unwrap();
    assert_eq!(t.rotation, 0.0);
    let props = t.table_props().unwrap();
    assert_eq!(props.shape, Shape::Square);
    assert!(props.seating.top.enabled);
    assert!(props.status.is_none());
}

#[test]
fn unknown_type_is_rejected() {
    let v = json!({ "id": uuid::Uuid::new_v4(), "type": "sofa", "x": 0, "y": 0, "width": 1, "height": 1 });
    assert!(serde_json::from_value::<FloorObject>(v).is_err());
}

#[test]
fn partial_object_skips_absent_fields() {
    let patch = PartialFloorObject { width: Some(120.0), ..Default::default() };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "width": 120.0 }));
}

// =============================================================
// FloorObject
// =============================================================

#[test]
fn object_type_and_layers() {
    let w = wall(0.0, 0.0, 100.0, 0.0);
    assert_eq!(w.object_type(), ObjectType::Wall);
    assert_eq!(door_on(&w, 50.0, 0.0).object_type().edit_layer(), EditLayer::Architecture);
    assert_eq!(table_at(0.0, 0.0).object_type().edit_layer(), EditLayer::Seating);
    assert!(ObjectType::Wall.layer() < ObjectType::Column.layer());
    assert!(ObjectType::Window.layer() < ObjectType::Door.layer());
}

#[test]
fn wall_segment_matches_authoring_points() {
    let w = wall(10.0, 20.0, 10.0, 220.0);
    let seg = w.wall_segment().unwrap();
    assert!(seg.start.distance(Point::new(10.0, 20.0)) < 1e-9);
    assert!(seg.end.distance(Point::new(10.0, 220.0)) < 1e-9);
    assert!(table_at(0.0, 0.0).wall_segment().is_none());
}

#[test]
fn set_attached_wall_only_for_openings() {
    let w = wall(0.0, 0.0, 100.0, 0.0);
    let mut d = door_on(&w, 50.0, 0.0);
    assert!(d.set_attached_wall_id(None));
    assert_eq!(d.attached_wall_id(), None);
    let mut t = table_at(0.0, 0.0);
    assert!(!t.set_attached_wall_id(Some(w.id)));
}

#[test]
fn normalize_grows_short_wall_about_center() {
    let mut w = wall(0.0, 0.0, 100.0, 0.0);
    let c = w.center();
    w.width = 5.0;
    w.set_center(c);
    w.normalize();
    assert_eq!(w.width, MIN_WALL_LENGTH);
    assert_eq!(w.center(), c);
}

#[test]
fn normalize_clamps_negative_sizes() {
    let mut t = table_at(0.0, 0.0);
    t.width = -4.0;
    t.normalize();
    assert_eq!(t.width, 0.0);
}

#[test]
fn partial_apply_reports_change() {
    let mut t = table_at(0.0, 0.0);
    let patch = PartialFloorObject { label: Some("VIP".into()), ..Default::default() };
    assert!(patch.apply_to(&mut t));
    assert_eq!(t.table_props().unwrap().label, "VIP");
    assert!(!patch.apply_to(&mut t));
}

#[test]
fn partial_alignment_ignored_for_non_walls() {
    let mut c = column_at(0.0, 0.0);
    let patch = PartialFloorObject { alignment: Some(Alignment::Left), ..Default::default() };
    assert!(!patch.apply_to(&mut c));
}

// =============================================================
// Scene
// =============================================================

#[test]
fn load_snapshot_does_not_bump_revision() {
    let mut scene = Scene::new();
    scene.load_snapshot(vec![wall(0.0, 0.0, 100.0, 0.0)]);
    assert_eq!(scene.revision(), 0);
    assert_eq!(scene.len(), 1);
}

#[test]
fn insert_swaps_in_new_collection() {
    let mut scene = Scene::new();
    let before = scene.snapshot();
    let change = scene.apply(SceneCommand::Insert(table_at(0.0, 0.0)));
    assert!(change.changed);
    assert_eq!(scene.revision(), 1);
    assert!(!Arc::ptr_eq(&before, &scene.snapshot()));
}

#[test]
fn duplicate_insert_is_noop() {
    let mut scene = Scene::new();
    let t = table_at(0.0, 0.0);
    scene.apply(SceneCommand::Insert(t.clone()));
    let change = scene.apply(SceneCommand::Insert(t));
    assert!(!change.changed);
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.revision(), 1);
}

#[test]
fn replace_unchanged_is_noop() {
    let mut scene = Scene::new();
    let t = table_at(0.0, 0.0);
    scene.load_snapshot(vec![t.clone()]);
    let before = scene.snapshot();
    assert!(!scene.apply(SceneCommand::Replace(vec![t])).changed);
    assert!(Arc::ptr_eq(&before, &scene.snapshot()));
}

#[test]
fn replace_ignores_unknown_ids() {
    let mut scene = Scene::new();
    scene.load_snapshot(vec![table_at(0.0, 0.0)]);
    assert!(!scene.apply(SceneCommand::Replace(vec![table_at(5.0, 5.0)])).changed);
    assert_eq!(scene.len(), 1);
}

#[test]
fn replace_preserves_order() {
    let a = table_at(0.0, 0.0);
    let b = column_at(10.0, 10.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![a.clone(), b.clone()]);
    let mut moved = a.clone();
    moved.x += 50.0;
    scene.apply(SceneCommand::Replace(vec![moved.clone()]));
    assert_eq!(scene.objects()[0], moved);
    assert_eq!(scene.objects()[1], b);
}

#[test]
fn remove_wall_cascades_to_openings() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let d = door_on(&w, 150.0, 0.0);
    let t = table_at(500.0, 500.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![w.clone(), d.clone(), t.clone()]);

    let change = scene.apply(SceneCommand::Remove(vec![w.id]));
    assert!(change.changed);
    assert_eq!(change.removed.len(), 2);
    assert!(change.removed.contains(&d.id));
    assert!(!scene.contains(&w.id));
    assert!(!scene.contains(&d.id));
    assert!(scene.contains(&t.id));
}

#[test]
fn remove_opening_keeps_wall() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let d = door_on(&w, 150.0, 0.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![w.clone(), d.clone()]);
    let change = scene.apply(SceneCommand::Remove(vec![d.id]));
    assert_eq!(change.removed, vec![d.id]);
    assert!(scene.contains(&w.id));
}

#[test]
fn remove_missing_is_noop() {
    let mut scene = Scene::new();
    assert!(!scene.apply(SceneCommand::Remove(vec![uuid::Uuid::new_v4()])).changed);
    assert_eq!(scene.revision(), 0);
}

#[test]
fn translate_moves_only_named_objects() {
    let a = table_at(0.0, 0.0);
    let b = table_at(100.0, 0.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![a.clone(), b.clone()]);
    scene.apply(SceneCommand::Translate { ids: vec![a.id], dx: 10.0, dy: -5.0 });
    assert_eq!(scene.get(&a.id).unwrap().x, a.x + 10.0);
    assert_eq!(scene.get(&a.id).unwrap().y, a.y - 5.0);
    assert_eq!(scene.get(&b.id).unwrap(), &b);
}

#[test]
fn zero_translate_is_noop() {
    let a = table_at(0.0, 0.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![a.clone()]);
    assert!(!scene.apply(SceneCommand::Translate { ids: vec![a.id], dx: 0.0, dy: 0.0 }).changed);
}

#[test]
fn replace_all_dedups_ids() {
    let a = table_at(0.0, 0.0);
    let mut scene = Scene::new();
    scene.apply(SceneCommand::ReplaceAll(vec![a.clone(), a.clone()]));
    assert_eq!(scene.len(), 1);
}

#[test]
fn sorted_objects_follow_layer_order() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let d = door_on(&w, 150.0, 0.0);
    let t = table_at(0.0, 100.0);
    let c = column_at(0.0, 200.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![d.clone(), t.clone(), w.clone(), c.clone()]);
    let order: Vec<ObjectId> = scene.sorted_objects().iter().map(|o| o.id).collect();
    assert_eq!(order, vec![w.id, c.id, t.id, d.id]);
}

#[test]
fn host_wall_ignores_dangling_reference() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let d = door_on(&w, 150.0, 0.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![d.clone()]);
    assert!(scene.host_wall(&d).is_none());
}

#[test]
fn attached_to_lists_openings() {
    let w = wall(0.0, 0.0, 300.0, 0.0);
    let d = door_on(&w, 100.0, 0.0);
    let t = table_at(0.0, 100.0);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![w.clone(), d.clone(), t]);
    let ids: Vec<ObjectId> = scene.attached_to(w.id).map(|o| o.id).collect();
    assert_eq!(ids, vec![d.id]);
}

#[test]
fn content_bounds_include_background() {
    let mut scene = Scene::new();
    assert!(scene.content_bounds().is_none());
    scene.load_snapshot(vec![table_at(0.0, 0.0)]);
    scene.load_background(vec![column_at(1000.0, 0.0)]);
    let b = scene.content_bounds().unwrap();
    assert_eq!(b.min_x, -35.0);
    assert_eq!(b.max_x, 1015.0);
}
