//! Host-side collaborators for the floor-plan editor.
//!
//! The editing core in `floorplan-canvas` is synchronous and does no I/O.
//! This crate supplies what it needs from the outside world: environment
//! configuration, a load/save store split into architecture and seating
//! namespaces, a debounced auto-save worker, and a [`session::FloorSession`]
//! that wires one floor's engine to all of them.

pub mod config;
pub mod services;
pub mod session;
pub mod store;
