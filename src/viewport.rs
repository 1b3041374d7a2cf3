//! Viewport state and the world↔screen coordinate mapping.
//!
//! The viewport owns the pan offset and zoom scale and converts between the
//! two coordinate systems everything else works in:
//!
//! - **World space**: the fixed logical coordinate system node positions are
//!   stored in, invariant under pan and zoom.
//! - **Screen space**: pixel coordinates inside the visible container after
//!   the viewport transform is applied.
//!
//! The transform is "translate by pan, then scale by zoom", with the origin
//! at the world layer's top-left:
//!
//! ```text
//! screen = world * zoom + pan
//! world  = (screen - pan) / zoom
//! ```
//!
//! Both directions are exact inverses (within floating-point tolerance), and
//! both degrade to identity-safe values when the container has no layout yet.

use euclid::{Point2D, Size2D, Transform2D, Vector2D};

/// Unit tag for the fixed logical coordinate system node positions live in.
pub struct WorldSpace;

/// Unit tag for pixel coordinates inside the visible container.
pub struct ScreenSpace;

pub type WorldPoint = Point2D<f32, WorldSpace>;
pub type WorldVector = Vector2D<f32, WorldSpace>;
pub type WorldSize = Size2D<f32, WorldSpace>;
pub type ScreenPoint = Point2D<f32, ScreenSpace>;
pub type ScreenVector = Vector2D<f32, ScreenSpace>;
pub type ScreenSize = Size2D<f32, ScreenSpace>;

/// Lower zoom bound. Requests below this are clamped, never rejected.
pub const MIN_ZOOM: f32 = 0.25;
/// Upper zoom bound. Requests above this are clamped, never rejected.
pub const MAX_ZOOM: f32 = 2.0;
/// Zoom increment for keyboard and button zoom.
pub const ZOOM_STEP: f32 = 0.1;
/// Pan distance for one arrow-key press, in screen pixels, regardless of zoom.
pub const ARROW_PAN_STEP: f32 = 50.0;
/// Zoom change per wheel unit when the zoom modifier is held.
pub const WHEEL_ZOOM_RATE: f32 = 0.001;

/// Arrow keys recognized for keyboard panning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

/// Zoom and two-touch distance recorded when a pinch begins.
#[derive(Clone, Copy, Debug)]
struct PinchStart {
    distance: f32,
    zoom: f32,
}

/// Pan/zoom state for one board session.
///
/// Ephemeral by design: a new session starts at zoom 1, pan (0,0). The pan
/// value itself is never clamped; only zoom is bounded.
#[derive(Clone, Debug)]
pub struct Viewport {
    zoom: f32,
    pan: ScreenVector,
    container: ScreenSize,
    pinch: Option<PinchStart>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a viewport at zoom 1, pan (0,0), with no container layout yet.
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: ScreenVector::zero(),
            container: ScreenSize::zero(),
            pinch: None,
        }
    }

    /// Current zoom scale, always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current pan offset in screen pixels.
    pub fn pan(&self) -> ScreenVector {
        self.pan
    }

    /// Container dimensions last reported by the host.
    pub fn container_size(&self) -> ScreenSize {
        self.container
    }

    /// Record the container's pixel dimensions.
    ///
    /// Non-finite or negative dimensions are treated as zero; a zero-size
    /// container is valid and all mappings stay divide-by-zero free.
    pub fn set_container_size(&mut self, size: ScreenSize) {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        self.container = ScreenSize::new(sanitize(size.width), sanitize(size.height));
    }

    /// Restore zoom 1 and pan (0,0).
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = ScreenVector::zero();
    }

    /// Set the zoom scale, silently clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Adjust zoom by a delta, clamped to the valid range.
    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    /// Step zoom up by [`ZOOM_STEP`] (keyboard/button zoom).
    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_STEP);
    }

    /// Step zoom down by [`ZOOM_STEP`] (keyboard/button zoom).
    pub fn zoom_out(&mut self) {
        self.zoom_by(-ZOOM_STEP);
    }

    /// Replace the pan offset.
    pub fn set_pan(&mut self, pan: ScreenVector) {
        if pan.x.is_finite() && pan.y.is_finite() {
            self.pan = pan;
        }
    }

    /// Shift the pan offset by a delta.
    pub fn pan_by(&mut self, delta: ScreenVector) {
        self.set_pan(self.pan + delta);
    }

    /// Zoom divisor that can never be zero, even if state was corrupted
    /// through deserialization or a host bug.
    fn safe_zoom(&self) -> f32 {
        if self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    /// Map a screen-space point to world space: `(p - pan) / zoom`.
    pub fn screen_to_world(&self, p: ScreenPoint) -> WorldPoint {
        let z = self.safe_zoom();
        let shifted = p - self.pan;
        WorldPoint::new(shifted.x / z, shifted.y / z)
    }

    /// Map a world-space point to screen space: `p * zoom + pan`.
    pub fn world_to_screen(&self, p: WorldPoint) -> ScreenPoint {
        ScreenPoint::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    /// The full viewport transform for the host's world layer: scale by
    /// zoom, then translate by pan. Applying it to a world point is
    /// equivalent to [`world_to_screen`](Self::world_to_screen).
    pub fn transform(&self) -> Transform2D<f32, WorldSpace, ScreenSpace> {
        Transform2D::scale(self.zoom, self.zoom).then_translate(self.pan)
    }

    /// Process a wheel event.
    ///
    /// With the zoom modifier held the vertical delta zooms continuously;
    /// otherwise the raw delta pans the view.
    pub fn handle_wheel(&mut self, delta: ScreenVector, zoom_modifier: bool) {
        if zoom_modifier {
            self.zoom_by(-delta.y * WHEEL_ZOOM_RATE);
        } else {
            self.pan_by(-delta);
        }
    }

    /// Process an arrow-key press.
    ///
    /// Pans by a fixed [`ARROW_PAN_STEP`] regardless of zoom. Suppressed
    /// while an editable text field has input focus so typing never moves
    /// the board.
    pub fn handle_arrow_key(&mut self, key: ArrowKey, editable_focused: bool) {
        if editable_focused {
            return;
        }
        let delta = match key {
            ArrowKey::Right => ScreenVector::new(-ARROW_PAN_STEP, 0.0),
            ArrowKey::Left => ScreenVector::new(ARROW_PAN_STEP, 0.0),
            ArrowKey::Down => ScreenVector::new(0.0, -ARROW_PAN_STEP),
            ArrowKey::Up => ScreenVector::new(0.0, ARROW_PAN_STEP),
        };
        self.pan_by(delta);
    }

    /// Begin a pinch gesture from the initial two-touch distance.
    ///
    /// A non-positive distance is ignored; the pinch simply never starts.
    pub fn begin_pinch(&mut self, distance: f32) {
        if distance.is_finite() && distance > 0.0 {
            self.pinch = Some(PinchStart {
                distance,
                zoom: self.zoom,
            });
        }
    }

    /// Update an active pinch from the current two-touch distance.
    ///
    /// The new zoom is the zoom recorded at gesture start scaled by the
    /// ratio of current to initial distance, clamped as usual.
    pub fn update_pinch(&mut self, distance: f32) {
        if let Some(start) = self.pinch {
            if distance.is_finite() && distance > 0.0 {
                self.set_zoom(start.zoom * (distance / start.distance));
            }
        }
    }

    /// End any active pinch gesture.
    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    /// Whether a pinch gesture is currently active.
    pub fn pinch_active(&self) -> bool {
        self.pinch.is_some()
    }

    /// Set the pan so `target` lands at the container center at the current
    /// zoom (inverse of `world_to_screen`, solved for pan).
    pub fn center_on(&mut self, target: WorldPoint) {
        let cx = self.container.width / 2.0;
        let cy = self.container.height / 2.0;
        self.set_pan(ScreenVector::new(
            cx - target.x * self.zoom,
            cy - target.y * self.zoom,
        ));
    }
}
