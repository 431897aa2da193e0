//! Deferred transitions.
//!
//! The pause after a completed wave is a scheduled task rather than a timer
//! callback. Each task is stamped with the session epoch it was scheduled in;
//! a task whose epoch no longer matches is dropped instead of firing, so a
//! restart during the pause cannot leak into the next session.

/// What to do when a deferred task comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Decide between victory and the next wave.
    ResolveWave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    action: DeferredAction,
    remaining_ms: f64,
    epoch: u64,
}

/// Holds at most one pending task, advanced by simulation time.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Option<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire after `delay_ms`. Replaces any pending task.
    pub fn schedule(&mut self, action: DeferredAction, delay_ms: f64, epoch: u64) {
        self.pending = Some(Pending {
            action,
            remaining_ms: delay_ms,
            epoch,
        });
    }

    /// Drop the pending task. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining_ms(&self) -> Option<f64> {
        self.pending.map(|p| p.remaining_ms.max(0.0))
    }

    /// Advance by `dt_ms`; returns the action if it came due this call.
    pub fn advance(&mut self, dt_ms: f64, current_epoch: u64) -> Option<DeferredAction> {
        let pending = self.pending.as_mut()?;
        if pending.epoch != current_epoch {
            log::debug!(
                "dropping stale {:?} from session epoch {}",
                pending.action,
                pending.epoch
            );
            self.pending = None;
            return None;
        }

        pending.remaining_ms -= dt_ms;
        if pending.remaining_ms <= 0.0 {
            self.pending.take().map(|p| p.action)
        } else {
            None
        }
    }
}
