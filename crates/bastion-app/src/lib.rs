//! BASTION frontend plumbing.
//!
//! Runs the simulation engine on a paced game-loop thread or as a fixed-step
//! headless run, hands snapshots to a pluggable sink, and provides a simple
//! autopilot input layer.

pub mod autopilot;
pub mod game_loop;
pub mod input;
pub mod sink;

pub use bastion_core as core;
