use super::*;
use crate::services::persistence::{AutosaveConfig, spawn_autosave_worker};
use crate::store::MemoryStore;
use floorplan_canvas::camera::Point;
use floorplan_canvas::doc::{Alignment, ObjectKind, ObjectType, Shape, TableProps};
use floorplan_canvas::geom::Placement;
use floorplan_canvas::input::{Button, Modifiers, Tool, WheelDelta};
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

// =============================================================================
// Helpers
// =============================================================================

fn ctx(layer: EditLayer) -> FloorContext {
    FloorContext::new(Uuid::from_u128(7), Uuid::from_u128(8), layer)
}

fn wall() -> FloorObject {
    FloorObject::wall(Point::new(0.0, 0.0), Point::new(300.0, 0.0), 15.0, Alignment::Center)
}

fn table() -> FloorObject {
    FloorObject::new(
        Placement::centered(Point::new(100.0, 100.0), 70.0, 70.0, 0.0),
        ObjectKind::Table(TableProps { shape: Shape::Circular, label: "T1".into(), seats: 4, ..Default::default() }),
    )
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.save(&ctx(EditLayer::Architecture), &[wall()]).await.unwrap();
    store.save(&ctx(EditLayer::Seating), &[table()]).await.unwrap();
    store
}

async fn open(store: Arc<MemoryStore>, quiet: Duration) -> FloorSession {
    let (handle, _worker) = spawn_autosave_worker(store.clone(), AutosaveConfig { quiet, queue_capacity: 16 });
    FloorSession::open(ctx(EditLayer::Architecture), store, handle, EditorConfig::default())
        .await
        .unwrap()
}

fn place(core: &mut EngineCore, tool: Tool, x: f64, y: f64) -> Vec<Action> {
    core.set_tool(tool);
    let mut actions = core.on_pointer_down(Point::new(x, y), Button::Primary, Modifiers::default());
    actions.extend(core.on_pointer_up(Point::new(x, y), Button::Primary, Modifiers::default()));
    actions
}

// =============================================================================
// open
// =============================================================================

#[tokio::test]
async fn open_loads_editable_and_background() {
    let session = open(seeded_store().await, Duration::from_millis(20)).await;
    assert_eq!(session.core().doc.len(), 1);
    assert!(session.core().doc.objects()[0].is_wall());
    assert_eq!(session.core().doc.background().len(), 1);
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn open_with_stopped_worker_fails() {
    let store = Arc::new(MemoryStore::new());
    let (handle, worker) = spawn_autosave_worker(store.clone(), AutosaveConfig::from_app(&Default::default()));
    worker.abort();
    let _ = worker.await;

    let result = FloorSession::open(ctx(EditLayer::Architecture), store, handle, EditorConfig::default()).await;
    assert!(matches!(result, Err(SessionError::AutosaveStopped)));
}

// =============================================================================
// dispatch / autosave
// =============================================================================

#[tokio::test]
async fn edit_is_autosaved_after_quiet_period() {
    let store = seeded_store().await;
    let mut session = open(store.clone(), Duration::from_millis(20)).await;

    let actions = session.dispatch(|core| place(core, Tool::Column, 500.0, 500.0));
    assert!(actions.iter().any(|a| matches!(a, Action::SceneChanged { .. })));
    // Queued, but not yet confirmed written.
    assert!(!session.schedule_save());
    assert!(session.is_dirty());

    sleep(Duration::from_millis(200)).await;
    let saved = store.load(&ctx(EditLayer::Architecture)).await.unwrap();
    assert_eq!(saved.editable.len(), 2);
    assert!(saved.editable.iter().any(|o| o.object_type() == ObjectType::Column));
    assert!(!session.is_dirty());

    // A further edit is dirty again until it, too, is written.
    session.dispatch(|core| place(core, Tool::Column, 600.0, 600.0));
    assert!(session.is_dirty());
}

#[tokio::test]
async fn camera_only_dispatch_queues_nothing() {
    let mut session = open(seeded_store().await, Duration::from_millis(20)).await;
    session.dispatch(|core| core.on_wheel(Point::new(0.0, 0.0), WheelDelta { dx: 10.0, dy: 10.0 }, Modifiers::default()));
    assert!(!session.schedule_save());
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn save_now_skips_quiet_period() {
    let store = seeded_store().await;
    let mut session = open(store.clone(), Duration::from_secs(30)).await;
    session.dispatch(|core| place(core, Tool::Column, 500.0, 500.0));

    session.save_now().await.unwrap();
    assert!(!session.is_dirty());
    assert_eq!(store.load(&ctx(EditLayer::Architecture)).await.unwrap().editable.len(), 2);
}

#[tokio::test]
async fn object_from_other_namespace_is_rejected_on_save() {
    let store = seeded_store().await;
    let mut session = open(store.clone(), Duration::from_secs(30)).await;
    session.dispatch(|core| place(core, Tool::Table, 500.0, 500.0));

    let err = session.save_now().await.unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::WrongLayer { .. })));
    assert_eq!(store.load(&ctx(EditLayer::Architecture)).await.unwrap().editable.len(), 1);
}

// =============================================================================
// switch_layer
// =============================================================================

#[tokio::test]
async fn switch_layer_saves_and_swaps_namespaces() {
    let store = seeded_store().await;
    let mut session = open(store.clone(), Duration::from_secs(30)).await;
    session.dispatch(|core| place(core, Tool::Column, 500.0, 500.0));

    session.switch_layer(EditLayer::Seating).await.unwrap();
    assert_eq!(session.ctx().layer, EditLayer::Seating);
    assert_eq!(session.core().doc.len(), 1);
    assert_eq!(session.core().doc.objects()[0].object_type(), ObjectType::Table);
    assert_eq!(session.core().doc.background().len(), 2);
    assert!(session.core().selection().is_none());
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn failed_switch_stays_on_current_layer() {
    let store = seeded_store().await;
    let mut session = open(store, Duration::from_secs(30)).await;
    session.dispatch(|core| place(core, Tool::Bar, 500.0, 500.0));

    assert!(session.switch_layer(EditLayer::Seating).await.is_err());
    assert_eq!(session.ctx().layer, EditLayer::Architecture);
    assert_eq!(session.core().doc.len(), 2);
    assert!(session.is_dirty());
}

#[tokio::test]
async fn switching_to_same_layer_is_noop() {
    let mut session = open(seeded_store().await, Duration::from_secs(30)).await;
    session.switch_layer(EditLayer::Architecture).await.unwrap();
    assert_eq!(session.core().doc.len(), 1);
}
