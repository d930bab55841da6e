#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use uuid::Uuid;

use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_object_types() {
    assert_eq!(Tool::Select.object_type(), None);
    assert_eq!(Tool::Wall.object_type(), Some(ObjectType::Wall));
    assert_eq!(Tool::Bar.object_type(), Some(ObjectType::Bar));
}

#[test]
fn tool_categories_are_disjoint() {
    for tool in [Tool::Select, Tool::Wall, Tool::Door, Tool::Window, Tool::Column, Tool::Table, Tool::Bar] {
        assert!(!(tool.is_opening() && tool.is_stamp()), "{tool:?}");
    }
    assert!(Tool::Door.is_opening());
    assert!(Tool::Window.is_opening());
    assert!(Tool::Table.is_stamp());
    assert!(!Tool::Wall.is_stamp());
}

// =============================================================
// Key
// =============================================================

#[test]
fn key_classification() {
    assert!(Key("Delete".into()).is_delete());
    assert!(Key("Backspace".into()).is_delete());
    assert!(Key("Escape".into()).is_escape());
    assert!(!Key("a".into()).is_delete());
}

// =============================================================
// SelectionRect
// =============================================================

#[test]
fn selection_rect_normalizes_corners() {
    let r = SelectionRect::from_corners(Point::new(100.0, 20.0), Point::new(40.0, 80.0));
    assert_eq!(r, SelectionRect { x: 40.0, y: 20.0, width: 60.0, height: 60.0 });
    let b = r.bounds();
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (40.0, 20.0, 100.0, 80.0));
}

// =============================================================
// UiState
// =============================================================

#[test]
fn select_only_replaces_selection() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut ui = UiState::default();
    ui.select_only(a);
    ui.select_only(b);
    assert_eq!(ui.selected_id, Some(b));
    assert_eq!(ui.selected_ids.len(), 1);
    assert!(ui.is_selected(&b));
    assert!(!ui.is_selected(&a));
}

#[test]
fn retain_selection_drops_missing_primary() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut ui = UiState::default();
    ui.selected_ids.insert(a);
    ui.selected_ids.insert(b);
    ui.selected_id = Some(b);
    ui.retain_selection(|id| *id == a);
    assert_eq!(ui.selected_id, Some(a));
    assert_eq!(ui.selected_ids.len(), 1);
}

#[test]
fn retain_selection_empty_clears_primary() {
    let a = Uuid::new_v4();
    let mut ui = UiState::default();
    ui.select_only(a);
    ui.retain_selection(|_| false);
    assert_eq!(ui.selected_id, None);
    assert!(ui.selected_ids.is_empty());
}

#[test]
fn clear_selection_resets_both() {
    let mut ui = UiState::default();
    ui.select_only(Uuid::new_v4());
    ui.clear_selection();
    assert_eq!(ui.selected_id, None);
    assert!(ui.selected_ids.is_empty());
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}
