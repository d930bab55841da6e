//! Editing core for restaurant floor plans.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the editing canvas: translating raw DOM input events into
//! scene mutations, keeping wall junctions seamless, snapping to the grid and
//! to walls, maintaining camera state for pan/zoom, hit-testing objects, and
//! rendering the plan. The host layer is responsible only for wiring DOM
//! events to the engine and persisting the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Floor objects, scene commands, and the scene store |
//! | [`geom`] | Wall reference lines, rectangles, and projections |
//! | [`junction`] | Wall corner/straight-run detection and extensions |
//! | [`snap`] | Grid and wall snapping |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against floor objects |
//! | [`display`] | Scene to display-list primitives (chairs, swings, dimensions) |
//! | [`render`] | Paints the display list with `Canvas2D` |
//! | [`config`] | Editor tunables (grid, snap threshold, defaults) |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod display;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod junction;
pub mod render;
pub mod snap;
