//! Device-to-field coordinate mapping.

use bastion_core::constants::{FIELD_HEIGHT, FIELD_WIDTH};
use bastion_core::types::Position;

/// Map a point on a `surface_w` x `surface_h` surface to play-field units.
///
/// Returns `None` for a degenerate surface.
pub fn map_to_field(px: f64, py: f64, surface_w: f64, surface_h: f64) -> Option<Position> {
    if surface_w <= 0.0 || surface_h <= 0.0 {
        return None;
    }
    Some(Position::new(
        px * FIELD_WIDTH / surface_w,
        py * FIELD_HEIGHT / surface_h,
    ))
}
