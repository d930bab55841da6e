use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::config::EditorConfig;
use crate::display::{self, Primitive};
use crate::doc::{
    Alignment, DoorType, FloorObject, ObjectId, ObjectKind, ObjectType, PartialFloorObject, Scene, SceneCommand,
    Seating, Shape, SwingDirection, TableProps,
};
use crate::geom::{self, Placement, Segment};
use crate::hit::{self, HitPart};
use crate::input::{
    Button, DragOrigin, Ghost, InputState, Key, Modifiers, SelectionRect, Tool, UiState, WheelDelta,
};
use crate::junction::{self, JunctionMap, WallEnd};
use crate::consts::WHEEL_ZOOM_STEP;
use crate::render;
use crate::snap::{self, WallSnap};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new collection was swapped into the scene; the host may schedule a save.
    SceneChanged { revision: u64 },
    ObjectCreated(FloorObject),
    ObjectsDeleted { ids: Vec<ObjectId> },
    SelectionChanged { selected: Vec<ObjectId> },
    SetCursor(String),
    RenderNeeded,
}

/// Whether the one-shot fit-to-content after loading is still owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFit {
    /// Waiting for content and a viewport.
    Pending,
    /// Already fitted once.
    Done,
    /// The user panned or zoomed first.
    Disabled,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: Scene,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub config: EditorConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    junctions: JunctionMap,
    auto_fit: AutoFit,
    cursor: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            doc: Scene::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            config: config.sanitized(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            junctions: JunctionMap::new(),
            auto_fit: AutoFit::Pending,
            cursor: String::from("default"),
        }
    }

    // --- Data inputs ---

    /// Hydrate the editable layer from a persisted snapshot.
    pub fn load_snapshot(&mut self, objects: Vec<FloorObject>) {
        self.doc.load_snapshot(objects);
        self.input = InputState::Idle;
        self.ui.marquee = None;
        self.ui.wall_preview = None;
        self.refresh_derived();
    }

    /// Hydrate the read-only background layer.
    pub fn load_background(&mut self, objects: Vec<FloorObject>) {
        self.doc.load_background(objects);
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
    }

    /// Run the one-shot fit-to-content if it is still owed and possible.
    ///
    /// Hosts call this once their (possibly multi-part) load has settled.
    /// Returns `true` if the camera moved.
    pub fn settle_auto_fit(&mut self) -> bool {
        if self.auto_fit != AutoFit::Pending {
            return false;
        }
        if self.fit_to_content() {
            self.auto_fit = AutoFit::Done;
            return true;
        }
        false
    }

    /// Frame all editable and background content in the viewport.
    pub fn fit_to_content(&mut self) -> bool {
        let Some(bounds) = self.doc.content_bounds() else {
            return false;
        };
        self.camera.fit_bounds(
            bounds.padded(self.config.fit_padding),
            self.viewport_width,
            self.viewport_height,
            self.config.fit_max_zoom,
        )
    }

    #[must_use]
    pub fn auto_fit(&self) -> AutoFit {
        self.auto_fit
    }

    // --- Tool ---

    /// Set the active tool, abandoning any pending wall start point and ghost.
    pub fn set_tool(&mut self, tool: Tool) {
        if matches!(self.input, InputState::CreatingWall { .. }) {
            self.input = InputState::Idle;
        }
        self.ui.wall_preview = None;
        self.ui.ghost = None;
        self.ui.tool = tool;
    }

    // --- Queries ---

    /// The primary selected object, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.ui.selected_id
    }

    /// Every selected object.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<ObjectId> {
        self.ui.selected_ids.iter().copied().collect()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&FloorObject> {
        self.doc.get(id)
    }

    /// Junction adjustments for the current walls.
    #[must_use]
    pub fn junctions(&self) -> &JunctionMap {
        &self.junctions
    }

    /// Display list for the current frame.
    #[must_use]
    pub fn display_list(&self) -> Vec<Primitive> {
        display::build(&self.doc, &self.junctions, &self.ui, &self.config, self.camera.zoom)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        match button {
            Button::Middle => {
                let resume = match std::mem::take(&mut self.input) {
                    InputState::Panning { resume, .. } => resume,
                    other => Box::new(other),
                };
                self.input = InputState::Panning { last_screen: screen_pt, resume };
                vec![Action::SetCursor("grabbing".into())]
            }
            Button::Secondary => Vec::new(),
            Button::Primary => {
                let world = self.camera.screen_to_world(screen_pt);
                match self.ui.tool {
                    Tool::Select => self.select_pointer_down(world, modifiers),
                    Tool::Wall => self.wall_pointer_down(world),
                    Tool::Door | Tool::Window => self.place_opening(world),
                    Tool::Column | Tool::Table | Tool::Bar => self.place_stamp(world),
                }
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        let grid = self.config.grid_size;

        match self.input.clone() {
            InputState::Idle => self.hover(world),
            InputState::Panning { last_screen, resume } => {
                self.camera.pan(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt, resume };
                self.auto_fit = AutoFit::Disabled;
                vec![Action::RenderNeeded]
            }
            InputState::Selecting { anchor_world } => {
                self.ui.marquee = Some(SelectionRect::from_corners(anchor_world, world));
                vec![Action::RenderNeeded]
            }
            InputState::DraggingObjects { start_world, origins, moved } => {
                let delta = snap::snap_point(world, grid).sub(start_world);
                let updated = self.dragged_positions(&origins, delta);
                let mut actions = self.commit(SceneCommand::Replace(updated));
                let moved = moved || !actions.is_empty();
                self.input = InputState::DraggingObjects { start_world, origins, moved };
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::DraggingWallHandle { original, end, attached, moved } => {
                let Some(old) = original.wall_segment() else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                let p = snap::snap_point(world, grid);
                let seg = match end {
                    WallEnd::Start => Segment::new(p, old.end),
                    WallEnd::End => Segment::new(old.start, p),
                };
                let updated = reshaped_wall(&original, seg, &attached);
                let mut actions = self.commit(SceneCommand::Replace(updated));
                let moved = moved || !actions.is_empty();
                self.input = InputState::DraggingWallHandle { original, end, attached, moved };
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::CreatingWall { start } => {
                self.ui.wall_preview = Some(Segment::new(start, snap::snap_point(world, grid)));
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { resume, .. } => {
                self.input = *resume;
                vec![Action::SetCursor(self.cursor.clone())]
            }
            InputState::Selecting { anchor_world } => {
                self.ui.marquee = None;
                let rect = SelectionRect::from_corners(anchor_world, world);
                let hits = hit::centroids_within(&self.doc, rect.bounds());
                if !modifiers.shift {
                    self.ui.clear_selection();
                }
                for id in hits {
                    self.ui.selected_ids.insert(id);
                    self.ui.selected_id = Some(id);
                }
                vec![self.selection_changed(), Action::RenderNeeded]
            }
            InputState::DraggingObjects { moved, origins, .. } => {
                if moved {
                    debug!(count = origins.len(), "objects moved");
                }
                vec![Action::RenderNeeded]
            }
            InputState::DraggingWallHandle { original, moved, .. } => {
                if moved {
                    debug!(wall = %original.id, "wall reshaped");
                }
                vec![Action::RenderNeeded]
            }
            creating @ InputState::CreatingWall { .. } => {
                self.input = creating;
                Vec::new()
            }
        }
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.ctrl || modifiers.meta {
            let factor = WHEEL_ZOOM_STEP.powf(-delta.dy / 100.0);
            self.camera.zoom_at(screen_pt, self.camera.zoom * factor);
        } else {
            self.camera.pan(-delta.dx, -delta.dy);
        }
        self.auto_fit = AutoFit::Disabled;
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_escape() {
            return self.cancel();
        }
        if key.is_delete() {
            return self.delete_selection();
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, _key: Key, _modifiers: Modifiers) -> Vec<Action> {
        Vec::new()
    }

    // --- Commands ---

    /// Unwind the most specific pending interaction: wall start point, then
    /// handle drag, then object drag or marquee, then selection, then tool.
    pub fn cancel(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::CreatingWall { .. } => {
                self.ui.wall_preview = None;
                return vec![Action::RenderNeeded];
            }
            InputState::DraggingWallHandle { original, attached, .. } => {
                let mut restore = vec![original];
                restore.extend(attached.into_iter().map(|(obj, _)| obj));
                let mut actions = self.commit(SceneCommand::Replace(restore));
                actions.push(Action::RenderNeeded);
                return actions;
            }
            InputState::DraggingObjects { origins, .. } => {
                let restore = origins.into_iter().map(|o| o.object).collect();
                let mut actions = self.commit(SceneCommand::Replace(restore));
                actions.push(Action::RenderNeeded);
                return actions;
            }
            InputState::Panning { resume, .. } => {
                if matches!(*resume, InputState::Idle) {
                    return vec![Action::RenderNeeded];
                }
                // Escape mid-pan unwinds the gesture the pan interrupted.
                self.input = *resume;
                return self.cancel();
            }
            InputState::Selecting { .. } => {
                self.ui.marquee = None;
                return vec![Action::RenderNeeded];
            }
            InputState::Idle => {}
        }

        if !self.ui.selected_ids.is_empty() {
            self.ui.clear_selection();
            return vec![self.selection_changed(), Action::RenderNeeded];
        }
        if self.ui.tool != Tool::Select {
            self.set_tool(Tool::Select);
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    /// Delete every selected object. Doors and windows on a deleted wall go with it.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        self.abandon_gesture();
        let change = self.doc.apply(SceneCommand::Remove(ids));
        if !change.changed {
            return Vec::new();
        }
        debug!(count = change.removed.len(), "objects deleted");
        self.refresh_derived();
        vec![
            Action::ObjectsDeleted { ids: change.removed },
            Action::SceneChanged { revision: self.doc.revision() },
            self.selection_changed(),
            Action::RenderNeeded,
        ]
    }

    /// Apply a numeric edit from the property panel.
    ///
    /// Walls keep their start point when only size or alignment changes, and
    /// carry attached openings along proportionally. Attached openings are
    /// re-validated against their host wall and keep its rotation.
    pub fn apply_properties(&mut self, id: &ObjectId, patch: &PartialFloorObject) -> Vec<Action> {
        let Some(original) = self.doc.get(id).cloned() else {
            return Vec::new();
        };
        let mut edited = original.clone();
        if !patch.apply_to(&mut edited) {
            return Vec::new();
        }
        edited.normalize();

        let updated = if let Some(old) = original.wall_segment() {
            let moves_rect = patch.x.is_some() || patch.y.is_some() || patch.rotation.is_some();
            if !moves_rect {
                let dir = old.direction();
                let len = old.length();
                let unit = if len > f64::EPSILON { dir.scale(1.0 / len) } else { Point::new(1.0, 0.0) };
                let alignment = edited.alignment().unwrap_or_default();
                let seg = Segment::new(old.start, old.start.add(unit.scale(edited.width)));
                edited.set_placement(geom::wall_from_points(seg.start, seg.end, edited.height, alignment));
            }
            let attached = self.attached_with_fractions(&original);
            let Some(seg) = edited.wall_segment() else {
                return Vec::new();
            };
            let mut out = vec![edited.clone()];
            out.extend(attached.iter().map(|(obj, t)| seat_on_segment(obj, &seg, edited.rotation, *t)));
            out
        } else {
            if let Some(host) = self.doc.host_wall(&edited) {
                if let Some(s) = snap::snap_to_wall(edited.center(), host, Some(edited.width)) {
                    edited.rotation = s.rotation;
                    edited.set_center(s.point);
                }
            }
            vec![edited]
        };

        let mut actions = self.commit(SceneCommand::Replace(updated));
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Move a wall's reference line, sliding attached openings along with it.
    pub fn set_wall_endpoints(&mut self, id: &ObjectId, start: Point, end: Point) -> Vec<Action> {
        let Some(wall) = self.doc.get(id).filter(|o| o.is_wall()).cloned() else {
            return Vec::new();
        };
        let attached = self.attached_with_fractions(&wall);
        let updated = reshaped_wall(&wall, Segment::new(start, end), &attached);
        let mut actions = self.commit(SceneCommand::Replace(updated));
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Release an opening from its host wall so it can be moved freely.
    pub fn detach_from_wall(&mut self, id: &ObjectId) -> Vec<Action> {
        let Some(mut obj) = self.doc.get(id).cloned() else {
            return Vec::new();
        };
        if obj.attached_wall_id().is_none() || !obj.set_attached_wall_id(None) {
            return Vec::new();
        }
        self.commit(SceneCommand::Replace(vec![obj]))
    }

    // --- Pointer-down handlers ---

    fn select_pointer_down(&mut self, world: Point, modifiers: Modifiers) -> Vec<Action> {
        let single_wall = self.single_selected_wall();

        let Some(hit) = hit::hit_test(world, &self.doc, &self.camera, single_wall) else {
            let mut actions = Vec::new();
            if !modifiers.shift && !self.ui.selected_ids.is_empty() {
                self.ui.clear_selection();
                actions.push(self.selection_changed());
            }
            self.input = InputState::Selecting { anchor_world: world };
            self.ui.marquee = Some(SelectionRect::from_corners(world, world));
            actions.push(Action::RenderNeeded);
            return actions;
        };

        if let HitPart::WallHandle(end) = hit.part {
            if let Some(original) = self.doc.get(&hit.object_id).cloned() {
                let attached = self.attached_with_fractions(&original);
                self.input = InputState::DraggingWallHandle { original, end, attached, moved: false };
            }
            return vec![Action::SetCursor("crosshair".into()), Action::RenderNeeded];
        }

        let id = hit.object_id;
        if modifiers.shift {
            if self.ui.is_selected(&id) {
                self.ui.selected_ids.remove(&id);
                if self.ui.selected_id == Some(id) {
                    self.ui.selected_id = self.ui.selected_ids.iter().next_back().copied();
                }
                return vec![self.selection_changed(), Action::RenderNeeded];
            }
            self.ui.selected_ids.insert(id);
            self.ui.selected_id = Some(id);
        } else if self.ui.is_selected(&id) {
            self.ui.selected_id = Some(id);
        } else {
            self.ui.select_only(id);
        }

        self.input = InputState::DraggingObjects {
            start_world: snap::snap_point(world, self.config.grid_size),
            origins: self.drag_origins(),
            moved: false,
        };
        vec![self.selection_changed(), Action::SetCursor("move".into()), Action::RenderNeeded]
    }

    fn wall_pointer_down(&mut self, world: Point) -> Vec<Action> {
        let p = snap::snap_point(world, self.config.grid_size);
        let InputState::CreatingWall { start } = self.input else {
            self.input = InputState::CreatingWall { start: p };
            self.ui.wall_preview = Some(Segment::new(p, p));
            return vec![Action::RenderNeeded];
        };

        let wall = FloorObject::wall(start, p, self.config.default_wall_thickness, Alignment::Center);
        debug!(wall = %wall.id, length = wall.width, "wall created");
        self.input = InputState::Idle;
        self.ui.wall_preview = None;
        self.insert_created(wall)
    }

    fn place_opening(&mut self, world: Point) -> Vec<Action> {
        let Some(ghost) = self.ghost_at(world) else {
            return Vec::new();
        };
        self.ui.ghost = Some(ghost);
        let Some(wall_id) = ghost.wall_id else {
            return vec![Action::RenderNeeded];
        };
        let kind = match ghost.object_type {
            ObjectType::Door => ObjectKind::Door {
                door_type: DoorType::default(),
                swing_direction: SwingDirection::default(),
                attached_wall_id: Some(wall_id),
            },
            _ => ObjectKind::Window { attached_wall_id: Some(wall_id) },
        };
        let obj = FloorObject::new(ghost.placement, kind);
        debug!(object = %obj.id, wall = %wall_id, "opening placed");
        self.insert_created(obj)
    }

    fn place_stamp(&mut self, world: Point) -> Vec<Action> {
        let center = snap::snap_point(world, self.config.grid_size);
        let size = self.config.default_table_size;
        let (kind, w, h) = match self.ui.tool {
            Tool::Column => {
                let s = self.config.default_column_size;
                (ObjectKind::Column { shape: Shape::Square }, s, s)
            }
            Tool::Bar => {
                let label = self.next_label(ObjectType::Bar, "B");
                (ObjectKind::Bar(new_table_props(Shape::Rectangular, label)), size * 2.0, size / 2.0)
            }
            _ => {
                let label = self.next_label(ObjectType::Table, "T");
                (ObjectKind::Table(new_table_props(Shape::Square, label)), size, size)
            }
        };
        let mut obj = FloorObject::new(Placement::centered(center, w, h, 0.0), kind);
        let seats = display::chair_positions(&obj, self.config.chair_spacing).len();
        if let Some(props) = obj.table_props_mut() {
            props.seats = u32::try_from(seats).unwrap_or(u32::MAX);
        }
        debug!(object = %obj.id, kind = ?obj.object_type(), "object placed");
        self.insert_created(obj)
    }

    // --- Helpers ---

    fn insert_created(&mut self, obj: FloorObject) -> Vec<Action> {
        let id = obj.id;
        let mut actions = vec![Action::ObjectCreated(obj.clone())];
        actions.extend(self.commit(SceneCommand::Insert(obj)));
        self.ui.select_only(id);
        actions.push(self.selection_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Apply a command and, if it changed the scene, refresh junctions and selection.
    fn commit(&mut self, command: SceneCommand) -> Vec<Action> {
        let change = self.doc.apply(command);
        if !change.changed {
            return Vec::new();
        }
        self.refresh_derived();
        vec![Action::SceneChanged { revision: self.doc.revision() }]
    }

    fn refresh_derived(&mut self) {
        self.junctions = junction::resolve_junctions(self.doc.walls());
        let doc = &self.doc;
        self.ui.retain_selection(|id| doc.contains(id));
    }

    /// Drop any in-progress gesture along with the previews it draws.
    fn abandon_gesture(&mut self) {
        self.input = InputState::Idle;
        self.ui.wall_preview = None;
        self.ui.marquee = None;
    }

    /// The selected wall whose handles are live: only with exactly one object selected.
    fn single_selected_wall(&self) -> Option<ObjectId> {
        if self.ui.selected_ids.len() != 1 {
            return None;
        }
        self.ui.selected_id.filter(|id| self.doc.get(id).is_some_and(FloorObject::is_wall))
    }

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged { selected: self.selected_ids() }
    }

    fn hover(&mut self, world: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.tool.is_opening() {
            self.ui.ghost = self.ghost_at(world);
            actions.push(Action::RenderNeeded);
        }
        let cursor = match self.ui.tool {
            Tool::Select => match hit::hit_test(world, &self.doc, &self.camera, self.single_selected_wall()) {
                Some(h) if matches!(h.part, HitPart::WallHandle(_)) => "crosshair",
                Some(_) => "move",
                None => "default",
            },
            Tool::Door | Tool::Window if self.ui.ghost.is_some_and(|g| g.wall_id.is_none()) => "not-allowed",
            _ => "crosshair",
        };
        if cursor != self.cursor {
            self.cursor = cursor.to_owned();
            actions.push(Action::SetCursor(self.cursor.clone()));
        }
        actions
    }

    /// Ghost preview for the active opening tool at `world`.
    fn ghost_at(&self, world: Point) -> Option<Ghost> {
        let object_type = self.ui.tool.object_type().filter(|t| t.is_opening())?;
        let width = self.config.default_opening_width;
        let p = snap::snap_point(world, self.config.grid_size);
        let hit = snap::snap_to_walls(p, self.doc.walls(), Some(width), self.config.wall_snap_threshold);
        Some(match hit {
            Some(WallSnap { point, rotation, wall_id, thickness, .. }) => Ghost {
                object_type,
                placement: Placement::centered(point, width, thickness, rotation),
                wall_id: Some(wall_id),
            },
            None => Ghost {
                object_type,
                placement: Placement::centered(p, width, self.config.default_wall_thickness, 0.0),
                wall_id: None,
            },
        })
    }

    /// Selected objects plus openings riding on selected walls, as drag origins.
    fn drag_origins(&self) -> Vec<DragOrigin> {
        let selected = &self.ui.selected_ids;
        let moving_walls: Vec<ObjectId> = selected
            .iter()
            .filter(|id| self.doc.get(id).is_some_and(FloorObject::is_wall))
            .copied()
            .collect();

        self.doc
            .objects()
            .iter()
            .filter(|o| selected.contains(&o.id) || o.attached_wall_id().is_some_and(|w| moving_walls.contains(&w)))
            .map(|o| {
                let constrained_to = self
                    .doc
                    .host_wall(o)
                    .map(|w| w.id)
                    .filter(|w| !moving_walls.contains(w));
                DragOrigin { object: o.clone(), constrained_to }
            })
            .collect()
    }

    fn dragged_positions(&self, origins: &[DragOrigin], delta: Point) -> Vec<FloorObject> {
        origins
            .iter()
            .map(|origin| {
                let mut obj = origin.object.clone();
                let target = obj.center().add(delta);
                let host = origin.constrained_to.and_then(|w| self.doc.get(&w));
                match host.and_then(|wall| snap::snap_to_wall(target, wall, Some(obj.width))) {
                    Some(s) => {
                        obj.rotation = s.rotation;
                        obj.set_center(s.point);
                    }
                    None => obj.set_center(target),
                }
                obj
            })
            .collect()
    }

    /// Openings attached to `wall` paired with their fractional position along it.
    fn attached_with_fractions(&self, wall: &FloorObject) -> Vec<(FloorObject, f64)> {
        let Some(seg) = wall.wall_segment() else {
            return Vec::new();
        };
        self.doc
            .attached_to(wall.id)
            .map(|o| (o.clone(), geom::fraction_along(o.center(), &seg)))
            .collect()
    }

    fn next_label(&self, object_type: ObjectType, prefix: &str) -> String {
        let n = self
            .doc
            .objects()
            .iter()
            .chain(self.doc.background().iter())
            .filter(|o| o.object_type() == object_type)
            .count();
        format!("{prefix}{}", n + 1)
    }
}

fn new_table_props(shape: Shape, label: String) -> TableProps {
    TableProps { shape, seating: Seating::default(), label, ..Default::default() }
}

/// Place `obj` at fraction `t` along `seg`, clamped so it stays within the span.
fn seat_on_segment(obj: &FloorObject, seg: &Segment, rotation: f64, t: f64) -> FloorObject {
    let mut out = obj.clone();
    let t = geom::clamp_fraction(t, seg, Some(obj.width));
    out.rotation = rotation;
    out.set_center(seg.point_at(t));
    out
}

/// `wall` rebuilt on a new reference line, with each attached opening moved
/// to its recorded fractional position on that line.
fn reshaped_wall(wall: &FloorObject, seg: Segment, attached: &[(FloorObject, f64)]) -> Vec<FloorObject> {
    let mut next = wall.clone();
    let alignment = wall.alignment().unwrap_or_default();
    next.set_placement(geom::wall_from_points(seg.start, seg.end, wall.height, alignment));
    let Some(new_seg) = next.wall_segment() else {
        return vec![next];
    };
    let rotation = next.rotation;
    let mut out = vec![next];
    out.extend(attached.iter().map(|(obj, t)| seat_on_segment(obj, &new_seg, rotation, *t)));
    out
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: EditorConfig) -> Self {
        Self { canvas, core: EngineCore::with_config(config) }
    }

    // --- Delegated data inputs ---

    pub fn load_snapshot(&mut self, objects: Vec<FloorObject>) {
        self.core.load_snapshot(objects);
    }

    pub fn load_background(&mut self, objects: Vec<FloorObject>) {
        self.core.load_background(objects);
    }

    pub fn settle_auto_fit(&mut self) -> bool {
        self.core.settle_auto_fit()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    pub fn apply_properties(&mut self, id: &ObjectId, patch: &PartialFloorObject) -> Vec<Action> {
        self.core.apply_properties(id, patch)
    }

    pub fn delete_selection(&mut self) -> Vec<Action> {
        self.core.delete_selection()
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the backing store to match.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width(device_pixels(self.core.viewport_width * self.core.dpr));
        self.canvas.set_height(device_pixels(self.core.viewport_height * self.core.dpr));
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn on_key_up(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.canvas.get_context("2d")? else {
            return Ok(());
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        render::draw(
            &ctx,
            &self.core.display_list(),
            &self.core.camera,
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&FloorObject> {
        self.core.object(id)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_pixels(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
