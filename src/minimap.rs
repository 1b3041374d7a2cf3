//! Minimap projection: world bounds and viewport overlay in one small box.
//!
//! The minimap is a read-only scaled view of a fixed world extent. All
//! outputs are percentages of the minimap's display area so hosts can lay
//! the overlay out in whatever units they like; only the overlay's own
//! display values are clamped — the underlying pan is never touched.

use crate::nodes::Node;
use crate::viewport::{Viewport, WorldPoint, WorldSize};

/// Default world extent represented by the minimap, in world units.
pub const WORLD_WIDTH: f32 = 3000.0;
/// See [`WORLD_WIDTH`].
pub const WORLD_HEIGHT: f32 = 2000.0;

/// A rectangle in percent of the minimap display area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapRect {
    pub x_pct: f32,
    pub y_pct: f32,
    pub width_pct: f32,
    pub height_pct: f32,
}

/// Projection from world space into the minimap's percentage space.
#[derive(Clone, Copy, Debug)]
pub struct Minimap {
    world: WorldSize,
}

impl Default for Minimap {
    fn default() -> Self {
        Self::new()
    }
}

impl Minimap {
    /// Minimap over the default world extent.
    pub fn new() -> Self {
        Self {
            world: WorldSize::new(WORLD_WIDTH, WORLD_HEIGHT),
        }
    }

    /// Minimap over a custom world extent; non-positive axes fall back to
    /// the defaults.
    pub fn with_world_extent(world: WorldSize) -> Self {
        if world.width > 0.0 && world.height > 0.0 {
            Self { world }
        } else {
            Self::new()
        }
    }

    pub fn world_extent(&self) -> WorldSize {
        self.world
    }

    /// Project a node's rectangle into minimap percentages.
    pub fn node_rect(&self, node: &Node) -> MinimapRect {
        MinimapRect {
            x_pct: node.position.x / self.world.width * 100.0,
            y_pct: node.position.y / self.world.height * 100.0,
            width_pct: node.size.width / self.world.width * 100.0,
            height_pct: node.size.height / self.world.height * 100.0,
        }
    }

    /// The viewport overlay rectangle: where the visible container sits
    /// within the world extent, as percentages clamped to `[0, 100]` for
    /// display.
    pub fn viewport_rect(&self, viewport: &Viewport) -> MinimapRect {
        let zoom = if viewport.zoom() > 0.0 {
            viewport.zoom()
        } else {
            1.0
        };
        let container = viewport.container_size();
        let clamp = |v: f32| {
            if v.is_finite() {
                v.clamp(0.0, 100.0)
            } else {
                0.0
            }
        };
        MinimapRect {
            x_pct: clamp(-viewport.pan().x / zoom / self.world.width * 100.0),
            y_pct: clamp(-viewport.pan().y / zoom / self.world.height * 100.0),
            width_pct: clamp(container.width / zoom / self.world.width * 100.0),
            height_pct: clamp(container.height / zoom / self.world.height * 100.0),
        }
    }

    /// Map a click inside the minimap display back to a world point.
    ///
    /// `display_width`/`display_height` are the minimap's own pixel
    /// dimensions; a zero-size display maps everything to the world origin
    /// rather than dividing by zero.
    pub fn click_to_world(
        &self,
        click_x: f32,
        click_y: f32,
        display_width: f32,
        display_height: f32,
    ) -> WorldPoint {
        let frac = |v: f32, extent: f32| {
            if extent > 0.0 && v.is_finite() {
                (v / extent).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        WorldPoint::new(
            frac(click_x, display_width) * self.world.width,
            frac(click_y, display_height) * self.world.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{ScreenSize, ScreenVector};

    fn viewport(zoom: f32, pan_x: f32, pan_y: f32) -> Viewport {
        let mut v = Viewport::new();
        v.set_container_size(ScreenSize::new(800.0, 600.0));
        v.set_zoom(zoom);
        v.set_pan(ScreenVector::new(pan_x, pan_y));
        v
    }

    // ========================================================================
    // Viewport overlay rectangle
    // ========================================================================

    #[test]
    fn test_viewport_rect_at_home_position() {
        let rect = Minimap::new().viewport_rect(&viewport(1.0, 0.0, 0.0));
        assert_eq!(rect.x_pct, 0.0);
        assert_eq!(rect.y_pct, 0.0);
        assert!((rect.width_pct - 26.666_668).abs() < 0.01);
        assert!((rect.height_pct - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_viewport_rect_follows_pan() {
        // pan (-300, -200) at zoom 1 means the view looks at world (300, 200).
        let rect = Minimap::new().viewport_rect(&viewport(1.0, -300.0, -200.0));
        assert!((rect.x_pct - 10.0).abs() < 0.01);
        assert!((rect.y_pct - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_viewport_rect_shrinks_as_zoom_grows() {
        let minimap = Minimap::new();
        let mut previous = f32::INFINITY;
        for zoom in [0.25, 0.5, 1.0, 1.5, 2.0] {
            let rect = minimap.viewport_rect(&viewport(zoom, 0.0, 0.0));
            assert!(rect.width_pct <= previous);
            previous = rect.width_pct;
        }
    }

    #[test]
    fn test_viewport_rect_clamps_display_values_only() {
        // A far-off pan pushes the overlay past the world edge; the overlay
        // clamps but the pan value itself is untouched.
        let v = viewport(1.0, 5000.0, -99999.0);
        let rect = Minimap::new().viewport_rect(&v);
        assert_eq!(rect.x_pct, 0.0);
        assert_eq!(rect.y_pct, 100.0);
        assert_eq!(v.pan(), ScreenVector::new(5000.0, -99999.0));
    }

    #[test]
    fn test_viewport_rect_zero_container() {
        let mut v = Viewport::new();
        v.set_container_size(ScreenSize::zero());
        let rect = Minimap::new().viewport_rect(&v);
        assert_eq!(rect.width_pct, 0.0);
        assert_eq!(rect.height_pct, 0.0);
    }

    // ========================================================================
    // Node projection
    // ========================================================================

    #[test]
    fn test_node_rect_projection() {
        let node = Node::new(1, WorldPoint::new(1500.0, 1000.0), "#abc", "n");
        let rect = Minimap::new().node_rect(&node);
        assert!((rect.x_pct - 50.0).abs() < 1e-3);
        assert!((rect.y_pct - 50.0).abs() < 1e-3);
        assert!(rect.width_pct > 0.0 && rect.height_pct > 0.0);
    }

    // ========================================================================
    // Click navigation
    // ========================================================================

    #[test]
    fn test_click_to_world_center() {
        let world = Minimap::new().click_to_world(75.0, 50.0, 150.0, 100.0);
        assert_eq!(world, WorldPoint::new(1500.0, 1000.0));
    }

    #[test]
    fn test_click_to_world_clamps_outside_clicks() {
        let minimap = Minimap::new();
        let world = minimap.click_to_world(-10.0, 500.0, 150.0, 100.0);
        assert_eq!(world, WorldPoint::new(0.0, 2000.0));
    }

    #[test]
    fn test_click_to_world_zero_display() {
        let world = Minimap::new().click_to_world(10.0, 10.0, 0.0, 0.0);
        assert_eq!(world, WorldPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_custom_world_extent_guards_zero() {
        let minimap = Minimap::with_world_extent(WorldSize::new(0.0, 500.0));
        assert_eq!(minimap.world_extent(), WorldSize::new(WORLD_WIDTH, WORLD_HEIGHT));
    }
}
