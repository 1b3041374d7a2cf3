//! The gesture state machine's vocabulary.
//!
//! One continuous pointer interaction — press to release — occupies exactly
//! one [`Gesture`] variant. The tagged union makes the mutual-exclusion
//! invariant structural: panning, dragging, and connection-drawing can never
//! be simultaneously true because there is only one place to put them.
//!
//! The persistent connect-mode toggle is deliberately *not* a gesture
//! state; it changes how a press on a node is interpreted but outlives any
//! individual gesture. It lives on the controller instead.

use crate::viewport::{ScreenPoint, ScreenVector, WorldPoint, WorldVector};

/// Pointer buttons the board reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
}

/// The single active gesture, if any.
///
/// Every variant carries the state captured at press time that the move
/// handler needs; nothing is recomputed from the live pointer except the
/// pointer itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// No interaction in progress.
    Idle,
    /// The view is being panned; pan follows the pointer's screen-space
    /// displacement from the press point.
    Panning {
        start_screen: ScreenPoint,
        start_pan: ScreenVector,
    },
    /// A node is being dragged; `grab_offset` is the world-space vector
    /// from the node's origin to the grab point, so the node does not jump
    /// under the pointer.
    DraggingNode {
        node_id: i32,
        grab_offset: WorldVector,
    },
    /// A connection is being drawn from a node; `current_world` trails the
    /// live pointer for preview rendering. Nothing is committed until
    /// release.
    DrawingConnection {
        from_node_id: i32,
        current_world: WorldPoint,
    },
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::Idle
    }
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The node being dragged, if a drag is in progress.
    pub fn dragged_node_id(&self) -> Option<i32> {
        match self {
            Gesture::DraggingNode { node_id, .. } => Some(*node_id),
            _ => None,
        }
    }
}
