//! # Board Canvas
//!
//! A framework-agnostic interaction core for building board applications: a
//! pannable, zoomable 2D workspace on which users place, drag, and connect
//! content nodes, with grid snapping and a synchronized minimap.
//!
//! The crate owns the hard parts — the viewport transform, the gesture
//! state machine, the node/connection model and its invariants, and the
//! minimap's coordinate mapping — and stays out of rendering entirely. The
//! host feeds in pointer, wheel, touch, and keyboard events plus its
//! container size, and draws from derived outputs: one affine transform
//! for the world layer, screen-space line endpoints per connection, and
//! grid path commands.
//!
//! ## Features
//!
//! - **Typed coordinate spaces** - world vs screen mixups are compile
//!   errors, via `euclid` phantom units
//! - **One gesture at a time** - panning, dragging, and connection drawing
//!   are a single tagged union; two modes can never be active at once by
//!   construction
//! - **Local-first persistence** - commits apply locally and flush
//!   fire-and-forget through an idempotent write queue; failures surface
//!   as transient notifications, never as rollbacks
//! - **Defensive geometry** - zoom is always clamped, zero-size containers
//!   never divide by zero
//!
//! ## Quick Start
//!
//! ```ignore
//! use board_canvas::{BoardController, PointerButton, ScreenPoint};
//! use std::rc::Rc;
//!
//! let board = BoardController::new(Rc::new(gateway), owner_id);
//! board.load()?;
//!
//! board.handle_pointer_pressed(ScreenPoint::new(120.0, 80.0), PointerButton::Left);
//! board.handle_pointer_moved(ScreenPoint::new(180.0, 140.0));
//! board.handle_pointer_released(ScreenPoint::new(180.0, 140.0));
//! ```
//!
//! ## Core Components
//!
//! - [`BoardController`] - the orchestrator hosts talk to
//! - [`Viewport`] - pan/zoom state and the world↔screen mapping
//! - [`Gesture`] - the interaction state machine's tagged union
//! - [`NodeStore`] / [`ConnectionStore`] - the board's data model
//! - [`Minimap`] - scaled projection of world bounds and the viewport
//! - [`PersistenceGateway`] - the storage trait the host implements

pub mod anchors;
pub mod connections;
pub mod controller;
pub mod gesture;
pub mod grid;
pub mod minimap;
pub mod nodes;
pub mod persistence;
pub mod viewport;

pub use anchors::{
    connection_line, nearest_anchor_pair, nearest_anchor_to_point, preview_line, AnchorSide,
    ConnectionLine,
};
pub use connections::{Connection, ConnectionError, ConnectionStore};
pub use controller::BoardController;
pub use gesture::{Gesture, PointerButton};
pub use grid::{grid_path_commands, snap_position, snap_to_grid, GRID_SIZE};
pub use hit_test::{find_node_at, nodes_in_rect, NodeGeometry};
pub use minimap::{Minimap, MinimapRect, WORLD_HEIGHT, WORLD_WIDTH};
pub use nodes::{Node, NodeStore, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH};
pub use persistence::{
    Notification, PersistenceError, PersistenceGateway, WriteOp, WriteQueue,
};
pub use viewport::{
    ArrowKey, ScreenPoint, ScreenSize, ScreenSpace, ScreenVector, Viewport, WorldPoint,
    WorldSize, WorldSpace, WorldVector, ARROW_PAN_STEP, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
