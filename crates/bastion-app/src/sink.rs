//! Snapshot sinks: where each frame's state goes after a tick.

use std::io::Write;

use thiserror::Error;

use bastion_core::state::GameStateSnapshot;

#[derive(Debug, Error)]
pub enum SinkError {
    /// Nothing to draw on right now. The frame is skipped.
    #[error("presentation surface unavailable")]
    SurfaceUnavailable,
    #[error("failed to write snapshot")]
    Io(#[from] std::io::Error),
    #[error("failed to encode snapshot")]
    Encode(#[from] serde_json::Error),
}

/// Consumer of per-frame snapshots (a renderer, a recorder, a pipe).
pub trait SnapshotSink {
    fn present(&mut self, snapshot: &GameStateSnapshot) -> Result<(), SinkError>;
}

/// Hand a snapshot to `sink`. Failures are logged and never stop the loop.
pub fn present_or_log(sink: &mut dyn SnapshotSink, snapshot: &GameStateSnapshot) {
    match sink.present(snapshot) {
        Ok(()) => {}
        Err(SinkError::SurfaceUnavailable) => {
            log::debug!("skipped frame {}: surface unavailable", snapshot.time.tick);
        }
        Err(err) => {
            log::warn!("frame {}: {err}", snapshot.time.tick);
        }
    }
}

/// Writes every `every`-th snapshot as one JSON line. `every == 0` writes
/// nothing.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    every: u64,
    frames: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, every: u64) -> Self {
        Self {
            writer,
            every,
            frames: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SnapshotSink for JsonLinesSink<W> {
    fn present(&mut self, snapshot: &GameStateSnapshot) -> Result<(), SinkError> {
        self.frames += 1;
        if self.every == 0 || self.frames % self.every != 0 {
            return Ok(());
        }
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn present(&mut self, _snapshot: &GameStateSnapshot) -> Result<(), SinkError> {
        Ok(())
    }
}
