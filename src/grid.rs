//! Grid snapping and background grid rendering.
//!
//! Snapping rounds a dragged position to the nearest multiple of the grid
//! size and clamps it into the non-negative world quadrant. The path-command
//! generator produces the board's background grid lines for the host to
//! stroke, aligned to the world origin under the current pan and zoom.

use crate::viewport::{Viewport, WorldPoint};

/// World-space grid cell size used for snapping and the background grid.
pub const GRID_SIZE: f32 = 20.0;

/// Grid lines closer together than this on screen are not worth drawing.
const MIN_VISIBLE_SPACING: f32 = 4.0;

/// Round a single axis value to the nearest grid multiple, clamped to ≥ 0.
///
/// A non-positive grid size disables rounding but still clamps.
pub fn snap_to_grid(value: f32, grid: f32) -> f32 {
    if grid <= 0.0 {
        return value.max(0.0);
    }
    ((value / grid).round() * grid).max(0.0)
}

/// Snap a world position to the grid, per axis.
pub fn snap_position(p: WorldPoint, grid: f32) -> WorldPoint {
    WorldPoint::new(snap_to_grid(p.x, grid), snap_to_grid(p.y, grid))
}

/// Generate path commands for the background grid lines.
///
/// Lines are emitted in screen space covering the viewport's container and
/// stay aligned with the world origin as the view pans and zooms. Returns an
/// empty string when the effective spacing is too small to be visible.
///
/// # Returns
/// Path commands (e.g., `"M 20 0 L 20 600 M 40 0 L 40 600 …"`).
pub fn grid_path_commands(viewport: &Viewport, spacing: f32) -> String {
    let width = viewport.container_size().width;
    let height = viewport.container_size().height;
    let effective_spacing = spacing * viewport.zoom();

    if effective_spacing < MIN_VISIBLE_SPACING {
        return String::new();
    }

    // A grid line through world x = k * spacing lands on screen at
    // pan.x + k * effective_spacing; the first visible one is the modulo.
    let offset_x = viewport.pan().x.rem_euclid(effective_spacing);
    let offset_y = viewport.pan().y.rem_euclid(effective_spacing);

    let mut commands = String::with_capacity(4096);

    let mut x = offset_x;
    while x < width + effective_spacing {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!("M {} 0 L {} {}", x, x, height));
        x += effective_spacing;
    }

    let mut y = offset_y;
    while y < height + effective_spacing {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!("M 0 {} L {} {}", y, width, y));
        y += effective_spacing;
    }

    commands
}
