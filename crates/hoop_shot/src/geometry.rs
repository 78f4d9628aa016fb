//! Axis-aligned boxes in play-area coordinates (origin top-left, y down).

use bevy::math::{Rect, Vec2};

/// Box of a square whose top-left corner is at `position`.
pub fn square_at(position: Vec2, size: f32) -> Rect {
    Rect {
        min: position,
        max: position + Vec2::splat(size),
    }
}

/// The hoop as drawn: 1.5 x 0.75 `target_size`, centered horizontally,
/// touching the top of the play area.
pub fn hoop_bounds(play_width: f32, target_size: f32) -> Rect {
    let size = Vec2::new(target_size * 1.5, target_size * 0.75);
    let min = Vec2::new(play_width / 2.0 - size.x / 2.0, 0.0);
    Rect {
        min,
        max: min + size,
    }
}

/// Strict overlap: boxes that only share an edge do not overlap.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}
