//! Simulation engine for BASTION.
//!
//! Owns the hecs ECS world and the session state, runs systems once per
//! frame, and produces GameStateSnapshots for the renderer. Headless and
//! deterministic for a given seed and input sequence.

pub mod engine;
pub mod query;
pub mod scheduler;
pub mod session;
pub mod systems;
pub mod world_setup;

pub use bastion_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
