//! Document model: floor objects, their per-type payloads, and the scene store.
//!
//! This module defines what is on the floor plan (`FloorObject`, a shared
//! positional base plus an `ObjectKind` payload per type), a sparse-update type
//! for the numeric property panel (`PartialFloorObject`), and the runtime
//! store that owns all live objects (`Scene`).
//!
//! The scene follows a replace-all discipline: every [`SceneCommand`] builds a
//! fresh collection and swaps it in, bumping a revision counter. Hosts detect
//! change by comparing revisions or by `Arc::ptr_eq` on [`Scene::snapshot`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::MIN_WALL_LENGTH;
use crate::geom::{self, Bounds, Placement, Segment};

/// Unique identifier for a floor object.
pub type ObjectId = Uuid;

/// Which side of the reference line a wall's thickness grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Center,
    Left,
    Right,
}

/// Footprint of a table, bar, or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Square,
    Rectangular,
    Circular,
    Semicircle,
}

impl Shape {
    #[must_use]
    pub fn is_round(self) -> bool {
        matches!(self, Self::Circular | Self::Semicircle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorType {
    #[default]
    Single,
    Double,
    Sliding,
}

/// Hinge side of a swinging door, looking along the host wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingDirection {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChairKind {
    #[default]
    Chair,
    Wheelchair,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSide {
    pub enabled: bool,
    #[serde(default)]
    pub kind: ChairKind,
}

impl Default for SeatSide {
    fn default() -> Self {
        Self { enabled: true, kind: ChairKind::Chair }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Per-side chair configuration for a table or bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Seating {
    pub top: SeatSide,
    pub right: SeatSide,
    pub bottom: SeatSide,
    pub left: SeatSide,
}

impl Seating {
    #[must_use]
    pub fn side(&self, side: Side) -> SeatSide {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set_side(&mut self, side: Side, seat: SeatSide) {
        match side {
            Side::Top => self.top = seat,
            Side::Right => self.right = seat,
            Side::Bottom => self.bottom = seat,
            Side::Left => self.left = seat,
        }
    }
}

/// Payload shared by tables and bars.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableProps {
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub seating: Seating,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub seats: u32,
    /// Live service state, written by the service module; never edited here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_pax: Option<u32>,
    #[serde(default, rename = "customerName", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

/// Per-type payload of a floor object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Wall {
        #[serde(default)]
        alignment: Alignment,
    },
    Door {
        #[serde(default, rename = "doorType")]
        door_type: DoorType,
        #[serde(default, rename = "swingDirection")]
        swing_direction: SwingDirection,
        #[serde(default, rename = "attachedWallId", skip_serializing_if = "Option::is_none")]
        attached_wall_id: Option<ObjectId>,
    },
    Window {
        #[serde(default, rename = "attachedWallId", skip_serializing_if = "Option::is_none")]
        attached_wall_id: Option<ObjectId>,
    },
    Column {
        #[serde(default)]
        shape: Shape,
    },
    Table(TableProps),
    Bar(TableProps),
}

/// Payload-free discriminant of [`ObjectKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Wall,
    Door,
    Window,
    Column,
    Table,
    Bar,
}

impl ObjectType {
    /// Draw order; lower layers are painted first.
    #[must_use]
    pub fn layer(self) -> u8 {
        match self {
            Self::Wall => 0,
            Self::Column => 1,
            Self::Table => 2,
            Self::Bar => 3,
            Self::Window => 4,
            Self::Door => 5,
        }
    }

    /// Whether objects of this type must sit on a wall when created.
    #[must_use]
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Door | Self::Window)
    }

    /// Which persistence namespace this type lives in.
    #[must_use]
    pub fn edit_layer(self) -> EditLayer {
        match self {
            Self::Wall | Self::Door | Self::Window | Self::Column => EditLayer::Architecture,
            Self::Table | Self::Bar => EditLayer::Seating,
        }
    }
}

/// The two object namespaces of a floor. One is edited, the other is shown as background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditLayer {
    #[default]
    Architecture,
    Seating,
}

/// A floor object as stored in the scene and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorObject {
    /// Unique identifier for this object.
    pub id: ObjectId,
    /// Left edge of the unrotated bounding box in world coordinates.
    pub x: f64,
    /// Top edge of the unrotated bounding box in world coordinates.
    pub y: f64,
    /// Unrotated width. For a wall, the reference-line length.
    pub width: f64,
    /// Unrotated height. For a wall, the thickness.
    pub height: f64,
    /// Clockwise rotation in degrees around the bounding-box center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl FloorObject {
    /// New object with a fresh v4 id.
    #[must_use]
    pub fn new(placement: Placement, kind: ObjectKind) -> Self {
        let mut obj = Self { id: Uuid::new_v4(), x: 0.0, y: 0.0, width: 0.0, height: 0.0, rotation: 0.0, kind };
        obj.set_placement(placement);
        obj
    }

    /// New wall whose reference line runs from `start` to `end`.
    #[must_use]
    pub fn wall(start: Point, end: Point, thickness: f64, alignment: Alignment) -> Self {
        Self::new(geom::wall_from_points(start, end, thickness, alignment), ObjectKind::Wall { alignment })
    }

    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self.kind {
            ObjectKind::Wall { .. } => ObjectType::Wall,
            ObjectKind::Door { .. } => ObjectType::Door,
            ObjectKind::Window { .. } => ObjectType::Window,
            ObjectKind::Column { .. } => ObjectType::Column,
            ObjectKind::Table(_) => ObjectType::Table,
            ObjectKind::Bar(_) => ObjectType::Bar,
        }
    }

    #[must_use]
    pub fn is_wall(&self) -> bool {
        matches!(self.kind, ObjectKind::Wall { .. })
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement { x: self.x, y: self.y, width: self.width, height: self.height, rotation: self.rotation }
    }

    pub fn set_placement(&mut self, p: Placement) {
        self.x = p.x;
        self.y = p.y;
        self.width = p.width;
        self.height = p.height;
        self.rotation = p.rotation;
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.placement().center()
    }

    /// Move so the center lands on `center`, keeping size.
    pub fn set_center(&mut self, center: Point) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.placement().bounds()
    }

    /// Wall alignment, or `None` for non-walls.
    #[must_use]
    pub fn alignment(&self) -> Option<Alignment> {
        match self.kind {
            ObjectKind::Wall { alignment } => Some(alignment),
            _ => None,
        }
    }

    /// Reference line of a wall, or `None` for non-walls.
    #[must_use]
    pub fn wall_segment(&self) -> Option<Segment> {
        self.alignment().map(|a| geom::wall_endpoints(&self.placement(), a))
    }

    #[must_use]
    pub fn attached_wall_id(&self) -> Option<ObjectId> {
        match self.kind {
            ObjectKind::Door { attached_wall_id, .. } | ObjectKind::Window { attached_wall_id } => attached_wall_id,
            _ => None,
        }
    }

    /// Set or clear the host wall. Returns `false` for types that cannot attach.
    pub fn set_attached_wall_id(&mut self, wall_id: Option<ObjectId>) -> bool {
        match &mut self.kind {
            ObjectKind::Door { attached_wall_id, .. } | ObjectKind::Window { attached_wall_id } => {
                *attached_wall_id = wall_id;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn table_props(&self) -> Option<&TableProps> {
        match &self.kind {
            ObjectKind::Table(p) | ObjectKind::Bar(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn table_props_mut(&mut self) -> Option<&mut TableProps> {
        match &mut self.kind {
            ObjectKind::Table(p) | ObjectKind::Bar(p) => Some(p),
            _ => None,
        }
    }

    /// Enforce per-type geometric floors: walls are at least [`MIN_WALL_LENGTH`]
    /// long, sizes are non-negative. Walls grow about their center.
    pub fn normalize(&mut self) {
        self.width = self.width.max(0.0);
        self.height = self.height.max(0.0);
        if self.is_wall() && self.width < MIN_WALL_LENGTH {
            let c = self.center();
            self.width = MIN_WALL_LENGTH;
            self.set_center(c);
        }
    }
}

/// Sparse update for a floor object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialFloorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Wall alignment; ignored for other types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Table or bar label; ignored for other types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PartialFloorObject {
    /// Apply present fields to `obj`. Returns `true` if anything changed.
    pub fn apply_to(&self, obj: &mut FloorObject) -> bool {
        let before = obj.clone();
        if let Some(x) = self.x {
            obj.x = x;
        }
        if let Some(y) = self.y {
            obj.y = y;
        }
        if let Some(w) = self.width {
            obj.width = w;
        }
        if let Some(h) = self.height {
            obj.height = h;
        }
        if let Some(r) = self.rotation {
            obj.rotation = r;
        }
        if let (Some(new), ObjectKind::Wall { alignment }) = (self.alignment, &mut obj.kind) {
            *alignment = new;
        }
        if let (Some(label), Some(props)) = (self.label.as_ref(), obj.table_props_mut()) {
            props.label.clone_from(label);
        }
        *obj != before
    }
}

/// A mutation of the scene. Every command replaces the whole collection.
#[derive(Debug, Clone)]
pub enum SceneCommand {
    /// Append a new object.
    Insert(FloorObject),
    /// Overwrite objects with matching ids; unknown ids are ignored.
    Replace(Vec<FloorObject>),
    /// Remove objects, plus any door or window attached to a removed wall.
    Remove(Vec<ObjectId>),
    /// Move objects by a world-space delta.
    Translate { ids: Vec<ObjectId>, dx: f64, dy: f64 },
    /// Swap in a whole new collection.
    ReplaceAll(Vec<FloorObject>),
}

/// What a [`SceneCommand`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneChange {
    /// Whether a new collection was swapped in.
    pub changed: bool,
    /// Ids that are no longer present.
    pub removed: Vec<ObjectId>,
}

/// The editable objects of one floor plus a read-only background layer.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Arc<Vec<FloorObject>>,
    index: HashMap<ObjectId, usize>,
    background: Arc<Vec<FloorObject>>,
    revision: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the editable objects wholesale without counting it as an edit.
    pub fn load_snapshot(&mut self, objects: Vec<FloorObject>) {
        self.swap_in(objects);
    }

    /// Replace the read-only background layer.
    pub fn load_background(&mut self, mut objects: Vec<FloorObject>) {
        objects.iter_mut().for_each(FloorObject::normalize);
        self.background = Arc::new(objects);
    }

    /// Apply a command, bumping the revision when the collection changes.
    pub fn apply(&mut self, command: SceneCommand) -> SceneChange {
        let next = match command {
            SceneCommand::Insert(obj) => {
                if self.index.contains_key(&obj.id) {
                    return SceneChange::default();
                }
                let mut next = self.objects.as_ref().clone();
                next.push(obj);
                next
            }
            SceneCommand::Replace(updated) => {
                let by_id: HashMap<ObjectId, FloorObject> = updated
                    .into_iter()
                    .filter(|o| self.index.contains_key(&o.id))
                    .map(|o| (o.id, o))
                    .collect();
                if by_id.values().all(|n| self.get(&n.id) == Some(n)) {
                    return SceneChange::default();
                }
                self.objects
                    .iter()
                    .map(|o| by_id.get(&o.id).cloned().unwrap_or_else(|| o.clone()))
                    .collect()
            }
            SceneCommand::Remove(ids) => {
                let doomed = self.removal_closure(&ids);
                if doomed.is_empty() {
                    return SceneChange::default();
                }
                let next = self.objects.iter().filter(|o| !doomed.contains(&o.id)).cloned().collect();
                let removed = self.objects.iter().filter(|o| doomed.contains(&o.id)).map(|o| o.id).collect();
                self.swap_in(next);
                self.revision += 1;
                return SceneChange { changed: true, removed };
            }
            SceneCommand::Translate { ids, dx, dy } => {
                let moving: HashSet<ObjectId> = ids.into_iter().filter(|id| self.index.contains_key(id)).collect();
                if moving.is_empty() || (dx == 0.0 && dy == 0.0) {
                    return SceneChange::default();
                }
                self.objects
                    .iter()
                    .map(|o| {
                        let mut o = o.clone();
                        if moving.contains(&o.id) {
                            o.x += dx;
                            o.y += dy;
                        }
                        o
                    })
                    .collect()
            }
            SceneCommand::ReplaceAll(objects) => objects,
        };
        self.swap_in(next);
        self.revision += 1;
        SceneChange { changed: true, removed: Vec::new() }
    }

    /// Ids in `ids` that exist, plus openings attached to any wall among them.
    fn removal_closure(&self, ids: &[ObjectId]) -> HashSet<ObjectId> {
        let mut doomed: HashSet<ObjectId> = ids.iter().copied().filter(|id| self.index.contains_key(id)).collect();
        let walls: HashSet<ObjectId> = doomed
            .iter()
            .filter(|id| self.get(id).is_some_and(FloorObject::is_wall))
            .copied()
            .collect();
        for obj in self.objects.iter() {
            if obj.attached_wall_id().is_some_and(|w| walls.contains(&w)) {
                doomed.insert(obj.id);
            }
        }
        doomed
    }

    fn swap_in(&mut self, mut objects: Vec<FloorObject>) {
        objects.iter_mut().for_each(FloorObject::normalize);
        let mut seen = HashSet::new();
        objects.retain(|o| seen.insert(o.id));
        self.index = objects.iter().enumerate().map(|(i, o)| (o.id, i)).collect();
        self.objects = Arc::new(objects);
    }

    /// Return a reference to an editable object by id.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&FloorObject> {
        self.index.get(id).and_then(|&i| self.objects.get(i))
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index.contains_key(id)
    }

    /// Editable objects in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[FloorObject] {
        &self.objects
    }

    /// Background objects in insertion order.
    #[must_use]
    pub fn background(&self) -> &[FloorObject] {
        &self.background
    }

    /// Shared handle to the current collection; a new edit yields a different `Arc`.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<FloorObject>> {
        Arc::clone(&self.objects)
    }

    /// Incremented on every applied command.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Editable walls in insertion order.
    pub fn walls(&self) -> impl Iterator<Item = &FloorObject> {
        self.objects.iter().filter(|o| o.is_wall())
    }

    /// Objects whose host wall is `wall_id`.
    pub fn attached_to(&self, wall_id: ObjectId) -> impl Iterator<Item = &FloorObject> {
        self.objects.iter().filter(move |o| o.attached_wall_id() == Some(wall_id))
    }

    /// The wall `obj` is attached to, if it is attached and that wall still exists.
    #[must_use]
    pub fn host_wall(&self, obj: &FloorObject) -> Option<&FloorObject> {
        obj.attached_wall_id()
            .and_then(|id| self.get(&id))
            .filter(|w| w.is_wall())
    }

    /// Editable objects in draw order (walls first, doors last), stable within a layer.
    #[must_use]
    pub fn sorted_objects(&self) -> Vec<&FloorObject> {
        let mut objs: Vec<&FloorObject> = self.objects.iter().collect();
        objs.sort_by_key(|o| o.object_type().layer());
        objs
    }

    /// Union of the bounds of editable and background objects.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.objects
            .iter()
            .chain(self.background.iter())
            .map(FloorObject::bounds)
            .reduce(Bounds::union)
    }

    /// Number of editable objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if there are no editable objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
