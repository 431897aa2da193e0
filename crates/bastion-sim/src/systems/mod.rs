//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only work) plus whatever slice of session state they need. They do
//! not own state.

pub mod cleanup;
pub mod collision;
pub mod fire_control;
pub mod motion;
pub mod snapshot;
pub mod spawner;
pub mod wave;
