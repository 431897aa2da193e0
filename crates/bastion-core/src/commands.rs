//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Launch an interceptor at a point in play-field coordinates.
    Fire { x: f64, y: f64 },
    /// Begin a new session from the start screen.
    StartSession,
    /// Skip the remaining wave-complete pause.
    AdvanceWave,
    /// Abandon the current session and return to the start screen.
    Restart,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
