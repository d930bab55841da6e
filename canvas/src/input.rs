//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Tool` and
//! `Modifiers` capture the user's intent at the time of a pointer event.
//! `InputState` is the interaction in progress, carrying all context needed
//! to compute positions from the pointer and to revert on Escape. `UiState`
//! is the transient state the renderer shows (selection, marquee, wall
//! preview, placement ghost).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::BTreeSet;

use crate::camera::Point;
use crate::doc::{FloorObject, ObjectId, ObjectType};
use crate::geom::{Bounds, Placement, Segment};
use crate::junction::WallEnd;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Two-click wall drawing.
    Wall,
    /// Place a door onto a wall.
    Door,
    /// Place a window onto a wall.
    Window,
    /// Place a column.
    Column,
    /// Place a table.
    Table,
    /// Place a bar counter.
    Bar,
}

impl Tool {
    /// The object type this tool creates, if any.
    #[must_use]
    pub fn object_type(self) -> Option<ObjectType> {
        match self {
            Self::Select => None,
            Self::Wall => Some(ObjectType::Wall),
            Self::Door => Some(ObjectType::Door),
            Self::Window => Some(ObjectType::Window),
            Self::Column => Some(ObjectType::Column),
            Self::Table => Some(ObjectType::Table),
            Self::Bar => Some(ObjectType::Bar),
        }
    }

    /// Whether this tool places a wall-mounted opening with a ghost preview.
    #[must_use]
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Door | Self::Window)
    }

    /// Whether a single click drops a free-standing object.
    #[must_use]
    pub fn is_stamp(self) -> bool {
        matches!(self, Self::Column | Self::Table | Self::Bar)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// World-space rectangle of the marquee, normalized so width/height are non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Rectangle spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { x: a.x.min(b.x), y: a.y.min(b.y), width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds { min_x: self.x, min_y: self.y, max_x: self.x + self.width, max_y: self.y + self.height }
    }
}

/// Non-committed preview of a door or window about to be placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub object_type: ObjectType,
    pub placement: Placement,
    /// Host wall under the pointer; `None` means a click would place nothing.
    pub wall_id: Option<ObjectId>,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Primary selection (the most recently clicked object).
    pub selected_id: Option<ObjectId>,
    /// Full selection set, always containing `selected_id` when that is set.
    pub selected_ids: BTreeSet<ObjectId>,
    /// Marquee rectangle while box-selecting.
    pub marquee: Option<SelectionRect>,
    /// Reference line of the wall being drawn, from the placed start point to the pointer.
    pub wall_preview: Option<Segment>,
    /// Placement preview for the door/window tools.
    pub ghost: Option<Ghost>,
}

impl UiState {
    /// Drop every selection reference to ids not accepted by `exists`.
    pub fn retain_selection(&mut self, exists: impl Fn(&ObjectId) -> bool) {
        self.selected_ids.retain(|id| exists(id));
        if self.selected_id.is_some_and(|id| !self.selected_ids.contains(&id)) {
            self.selected_id = self.selected_ids.iter().next_back().copied();
        }
    }

    /// Select exactly one object.
    pub fn select_only(&mut self, id: ObjectId) {
        self.selected_ids.clear();
        self.selected_ids.insert(id);
        self.selected_id = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
        self.selected_id = None;
    }

    #[must_use]
    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.selected_ids.contains(id)
    }
}

/// An object's state at the start of a drag, used to compute positions and revert.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOrigin {
    pub object: FloorObject,
    /// Re-snap to the host wall on every move instead of translating freely.
    pub constrained_to: Option<ObjectId>,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute positions
/// and to restore the scene if the gesture is cancelled.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
        /// Gesture interrupted by the pan, restored when the pan ends.
        resume: Box<InputState>,
    },
    /// The user is dragging out a marquee from an anchor corner.
    Selecting {
        /// World-space corner where the drag started.
        anchor_world: Point,
    },
    /// The user is moving the selection (plus any openings riding on selected walls).
    DraggingObjects {
        /// Grid-snapped world position of the pointer at pointer-down.
        start_world: Point,
        /// Every object that moves, as it was at pointer-down.
        origins: Vec<DragOrigin>,
        /// Whether any move event has changed the scene yet.
        moved: bool,
    },
    /// The user is dragging one endpoint of a wall.
    DraggingWallHandle {
        /// The wall as it was at pointer-down.
        original: FloorObject,
        /// Which end is being dragged.
        end: WallEnd,
        /// Attached openings as they were at pointer-down, with their fractional position.
        attached: Vec<(FloorObject, f64)>,
        /// Whether any move event has changed the scene yet.
        moved: bool,
    },
    /// The first point of a new wall has been placed; waiting for the second click.
    CreatingWall {
        /// Grid-snapped world start point.
        start: Point,
    },
}
