//! High-level controller for board canvas applications.
//!
//! The [`BoardController`] ties the pieces together: it owns the viewport,
//! the gesture state machine, the node and connection stores, and the
//! write queue, and it is the single entry point for host input events.
//!
//! # Example
//!
//! ```ignore
//! use board_canvas::{BoardController, PointerButton, ScreenPoint, ScreenSize};
//! use std::rc::Rc;
//!
//! let gateway = Rc::new(MyGateway::connect()?);
//! let board = BoardController::new(gateway, session.user_id());
//! board.load()?;
//! board.set_container_size(ScreenSize::new(800.0, 600.0));
//!
//! // Wire host events straight through:
//! canvas.on_pointer_down(|x, y, button| {
//!     board.handle_pointer_pressed(ScreenPoint::new(x, y), button)
//! });
//! canvas.on_pointer_move(|x, y| board.handle_pointer_moved(ScreenPoint::new(x, y)));
//! canvas.on_pointer_up(|x, y| board.handle_pointer_released(ScreenPoint::new(x, y)));
//!
//! // And render from the derived outputs:
//! let transform = board.transform();
//! let lines = board.connection_lines();
//! ```
//!
//! Every handler runs synchronously inside the input callback that
//! triggered it; commits update local state first and then flush the write
//! queue fire-and-forget. Clone the controller to share it across
//! callbacks.

use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;

use crate::anchors::{self, ConnectionLine};
use crate::connections::ConnectionStore;
use crate::gesture::{Gesture, PointerButton};
use crate::grid::{self, GRID_SIZE};
use crate::hit_test::find_node_at;
use crate::minimap::{Minimap, MinimapRect};
use crate::nodes::{Node, NodeStore};
use crate::persistence::{Notification, PersistenceError, PersistenceGateway, WriteOp, WriteQueue};
use crate::viewport::{
    ArrowKey, ScreenPoint, ScreenSize, ScreenVector, Viewport, WorldPoint,
};

/// Orchestrates one board session.
///
/// All state lives in `Rc` cells so clones share it; the controller is
/// single-threaded by design — there is exactly one logical writer, the
/// local session.
#[derive(Clone)]
pub struct BoardController {
    gateway: Rc<dyn PersistenceGateway>,
    owner_id: Rc<RefCell<String>>,
    board_id: Rc<RefCell<Option<String>>>,
    viewport: Rc<RefCell<Viewport>>,
    gesture: Rc<RefCell<Gesture>>,
    nodes: Rc<RefCell<NodeStore>>,
    connections: Rc<RefCell<ConnectionStore>>,
    minimap: Rc<RefCell<Minimap>>,
    queue: Rc<RefCell<WriteQueue>>,
    notifications: Rc<RefCell<Vec<Notification>>>,
    connect_mode: Rc<Cell<bool>>,
    snap_enabled: Rc<Cell<bool>>,
    space_held: Rc<Cell<bool>>,
    next_node_id: Rc<Cell<i32>>,
    next_connection_id: Rc<Cell<i32>>,
}

impl BoardController {
    /// Create a controller for the given owner over the given gateway.
    ///
    /// Grid snapping starts enabled, connect mode disabled.
    pub fn new(gateway: Rc<dyn PersistenceGateway>, owner_id: impl Into<String>) -> Self {
        Self {
            gateway,
            owner_id: Rc::new(RefCell::new(owner_id.into())),
            board_id: Rc::new(RefCell::new(None)),
            viewport: Rc::new(RefCell::new(Viewport::new())),
            gesture: Rc::new(RefCell::new(Gesture::Idle)),
            nodes: Rc::new(RefCell::new(NodeStore::new())),
            connections: Rc::new(RefCell::new(ConnectionStore::new())),
            minimap: Rc::new(RefCell::new(Minimap::new())),
            queue: Rc::new(RefCell::new(WriteQueue::new())),
            notifications: Rc::new(RefCell::new(Vec::new())),
            connect_mode: Rc::new(Cell::new(false)),
            snap_enabled: Rc::new(Cell::new(true)),
            space_held: Rc::new(Cell::new(false)),
            next_node_id: Rc::new(Cell::new(1)),
            next_connection_id: Rc::new(Cell::new(1)),
        }
    }

    // === Session lifecycle ===

    /// Replace local state with the owner's persisted board.
    ///
    /// Load failures propagate so the host can retry; nothing is partially
    /// applied on error.
    pub fn load(&self) -> Result<(), PersistenceError> {
        let owner = self.owner_id.borrow().clone();
        let board = self.board_id.borrow().clone();
        let nodes = self.gateway.load_nodes(&owner, board.as_deref())?;
        let connections = self.gateway.load_connections(&owner)?;

        *self.nodes.borrow_mut() = NodeStore::from_nodes(nodes);
        *self.connections.borrow_mut() = ConnectionStore::from_connections(connections);
        self.next_node_id.set(self.nodes.borrow().max_id() + 1);
        self.next_connection_id
            .set(self.connections.borrow().max_id() + 1);
        Ok(())
    }

    /// Select which of the owner's boards subsequent loads read.
    pub fn set_board_id(&self, board_id: Option<String>) {
        *self.board_id.borrow_mut() = board_id;
    }

    /// Record the container's pixel dimensions from the host's layout.
    pub fn set_container_size(&self, size: ScreenSize) {
        self.viewport.borrow_mut().set_container_size(size);
    }

    // === Mode toggles ===

    pub fn connect_mode(&self) -> bool {
        self.connect_mode.get()
    }

    /// Toggle how a press on a node is interpreted: drag (off) or draw a
    /// connection (on). Persistent across gestures.
    pub fn set_connect_mode(&self, on: bool) {
        self.connect_mode.set(on);
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled.get()
    }

    pub fn set_snap_enabled(&self, on: bool) {
        self.snap_enabled.set(on);
    }

    /// Track the space key; while held, any press starts a pan.
    pub fn set_space_held(&self, held: bool) {
        self.space_held.set(held);
    }

    // === Pointer input ===

    /// Begin a gesture from a pointer press.
    ///
    /// Mutual exclusion is enforced here: while a gesture is active, further
    /// presses are ignored — the first press wins until release.
    pub fn handle_pointer_pressed(&self, at: ScreenPoint, button: PointerButton) {
        let mut gesture = self.gesture.borrow_mut();
        if !gesture.is_idle() {
            return;
        }

        let viewport = self.viewport.borrow();
        let world = viewport.screen_to_world(at);
        let panning = Gesture::Panning {
            start_screen: at,
            start_pan: viewport.pan(),
        };

        if button == PointerButton::Middle || self.space_held.get() {
            *gesture = panning;
            return;
        }

        let hit = {
            let nodes = self.nodes.borrow();
            find_node_at(world.x, world.y, nodes.iter())
        };

        match (hit, self.connect_mode.get()) {
            (Some(node_id), true) => {
                *gesture = Gesture::DrawingConnection {
                    from_node_id: node_id,
                    current_world: world,
                };
            }
            (Some(node_id), false) => {
                let nodes = self.nodes.borrow();
                if let Some(node) = nodes.get(node_id) {
                    *gesture = Gesture::DraggingNode {
                        node_id,
                        grab_offset: world - node.position,
                    };
                }
            }
            (None, false) => *gesture = panning,
            // Connect mode presses on empty canvas do nothing.
            (None, true) => {}
        }
    }

    /// Advance the active gesture to a new pointer position.
    pub fn handle_pointer_moved(&self, at: ScreenPoint) {
        let mut gesture = self.gesture.borrow_mut();
        match *gesture {
            Gesture::Idle => {}
            Gesture::Panning {
                start_screen,
                start_pan,
            } => {
                let delta = at - start_screen;
                self.viewport.borrow_mut().set_pan(start_pan + delta);
            }
            Gesture::DraggingNode {
                node_id,
                grab_offset,
            } => {
                let world = self.viewport.borrow().screen_to_world(at);
                let mut target = world - grab_offset;
                if self.snap_enabled.get() {
                    target = grid::snap_position(target, GRID_SIZE);
                }
                self.nodes.borrow_mut().set_position(node_id, target);
            }
            Gesture::DrawingConnection { from_node_id, .. } => {
                let world = self.viewport.borrow().screen_to_world(at);
                *gesture = Gesture::DrawingConnection {
                    from_node_id,
                    current_world: world,
                };
            }
        }
    }

    /// Finish the active gesture, committing its result.
    pub fn handle_pointer_released(&self, at: ScreenPoint) {
        let finished = mem::replace(&mut *self.gesture.borrow_mut(), Gesture::Idle);
        match finished {
            Gesture::Idle | Gesture::Panning { .. } => {}
            Gesture::DraggingNode { node_id, .. } => {
                let position = self.nodes.borrow().get(node_id).map(|n| n.position);
                if let Some(p) = position {
                    self.queue.borrow_mut().push(WriteOp::UpdateNodePosition {
                        id: node_id,
                        x: p.x,
                        y: p.y,
                    });
                    self.flush_writes();
                }
            }
            Gesture::DrawingConnection { from_node_id, .. } => {
                let world = self.viewport.borrow().screen_to_world(at);
                let target = {
                    let nodes = self.nodes.borrow();
                    find_node_at(world.x, world.y, nodes.iter())
                };
                if let Some(to_node_id) = target {
                    // Invalid targets (self, duplicate pair) discard silently.
                    self.create_connection(from_node_id, to_node_id);
                }
            }
        }
    }

    /// Abandon the active gesture without committing (pointer leave or
    /// cancel). A drag's last applied position is kept as-is.
    pub fn handle_pointer_cancelled(&self) {
        let abandoned = mem::replace(&mut *self.gesture.borrow_mut(), Gesture::Idle);
        if !abandoned.is_idle() {
            log::debug!("gesture cancelled without commit: {:?}", abandoned);
        }
    }

    // === Wheel, keyboard, touch ===

    /// Plain wheel pans by the raw delta; with the zoom modifier the
    /// vertical delta zooms continuously.
    pub fn handle_wheel(&self, delta: ScreenVector, zoom_modifier: bool) {
        self.viewport.borrow_mut().handle_wheel(delta, zoom_modifier);
    }

    /// Arrow-key panning; suppressed while an editable field has focus.
    pub fn handle_arrow_key(&self, key: ArrowKey, editable_focused: bool) {
        self.viewport
            .borrow_mut()
            .handle_arrow_key(key, editable_focused);
    }

    pub fn zoom_in(&self) {
        self.viewport.borrow_mut().zoom_in();
    }

    pub fn zoom_out(&self) {
        self.viewport.borrow_mut().zoom_out();
    }

    /// Restore zoom 1, pan (0,0).
    pub fn reset_view(&self) {
        self.viewport.borrow_mut().reset();
    }

    /// Two-finger touch begins a pinch; any in-progress gesture is
    /// abandoned, uncommitted, like a pointer cancel.
    pub fn handle_touch_start(&self, touches: &[ScreenPoint]) {
        if let Some(distance) = touch_distance(touches) {
            self.handle_pointer_cancelled();
            self.viewport.borrow_mut().begin_pinch(distance);
        }
    }

    pub fn handle_touch_move(&self, touches: &[ScreenPoint]) {
        if let Some(distance) = touch_distance(touches) {
            self.viewport.borrow_mut().update_pinch(distance);
        }
    }

    pub fn handle_touch_end(&self) {
        self.viewport.borrow_mut().end_pinch();
    }

    // === Node and connection operations ===

    /// Place a new node, persist it, and return its session-local id.
    pub fn add_node(
        &self,
        position: WorldPoint,
        color: impl Into<String>,
        title: impl Into<String>,
        payload: serde_json::Value,
    ) -> i32 {
        let id = self.next_node_id.get();
        self.next_node_id.set(id + 1);

        let mut node = Node::new(id, position, color, title);
        node.payload = payload;
        self.nodes.borrow_mut().insert(node.clone());

        self.queue.borrow_mut().push(WriteOp::CreateNode(node));
        self.flush_writes();
        id
    }

    /// Delete a node, cascading to every connection touching it.
    ///
    /// The remote delete covers dependent connections server-side; locally
    /// the store prunes them immediately.
    pub fn delete_node(&self, id: i32) -> bool {
        if self.nodes.borrow_mut().remove(id).is_none() {
            return false;
        }
        let pruned = self.connections.borrow_mut().prune_node(id);
        log::debug!("deleted node {} and {} dependent connections", id, pruned.len());

        self.queue.borrow_mut().push(WriteOp::DeleteNode { id });
        self.flush_writes();
        true
    }

    /// Create a connection between two nodes, persist it, and return its
    /// id. Self-loops and duplicate pairs are rejected silently.
    pub fn create_connection(&self, from_node_id: i32, to_node_id: i32) -> Option<i32> {
        let id = self.next_connection_id.get();
        let created = {
            let nodes = self.nodes.borrow();
            self.connections
                .borrow_mut()
                .create(id, from_node_id, to_node_id, &nodes)
        };
        match created {
            Ok(conn) => {
                self.next_connection_id.set(id + 1);
                self.queue.borrow_mut().push(WriteOp::CreateConnection {
                    id: conn.id,
                    from_node_id,
                    to_node_id,
                });
                self.flush_writes();
                Some(conn.id)
            }
            Err(err) => {
                log::debug!("connection rejected: {}", err);
                None
            }
        }
    }

    /// Remove a connection by id and persist the removal.
    pub fn remove_connection(&self, id: i32) -> bool {
        if self.connections.borrow_mut().remove(id).is_none() {
            return false;
        }
        self.queue.borrow_mut().push(WriteOp::DeleteConnection { id });
        self.flush_writes();
        true
    }

    // === Derived render state ===

    /// The viewport transform for the host's fixed-size world layer.
    pub fn transform(&self) -> euclid::Transform2D<f32, crate::viewport::WorldSpace, crate::viewport::ScreenSpace> {
        self.viewport.borrow().transform()
    }

    /// Screen-space line endpoints for every renderable connection.
    pub fn connection_lines(&self) -> Vec<ConnectionLine> {
        let nodes = self.nodes.borrow();
        let viewport = self.viewport.borrow();
        self.connections
            .borrow()
            .iter()
            .filter_map(|conn| anchors::connection_line(conn, &nodes, &viewport))
            .collect()
    }

    /// The live line from the source node to the pointer while a
    /// connection is being drawn.
    pub fn preview_line(&self) -> Option<(ScreenPoint, ScreenPoint)> {
        if let Gesture::DrawingConnection {
            from_node_id,
            current_world,
        } = *self.gesture.borrow()
        {
            let nodes = self.nodes.borrow();
            let node = nodes.get(from_node_id)?;
            return Some(anchors::preview_line(
                node,
                current_world,
                &self.viewport.borrow(),
            ));
        }
        None
    }

    /// Background grid path commands for the current view.
    pub fn grid_commands(&self) -> String {
        grid::grid_path_commands(&self.viewport.borrow(), GRID_SIZE)
    }

    // === Minimap ===

    /// The minimap overlay rectangle for the current viewport.
    pub fn minimap_viewport_rect(&self) -> MinimapRect {
        self.minimap.borrow().viewport_rect(&self.viewport.borrow())
    }

    /// Every node projected into minimap percentages.
    pub fn minimap_node_rects(&self) -> Vec<(i32, MinimapRect)> {
        let minimap = self.minimap.borrow();
        self.nodes
            .borrow()
            .iter()
            .map(|n| (n.id, minimap.node_rect(n)))
            .collect()
    }

    /// Recenter the view on the world point under a minimap click.
    pub fn navigate_minimap(
        &self,
        click_x: f32,
        click_y: f32,
        display_width: f32,
        display_height: f32,
    ) {
        let target = self.minimap.borrow().click_to_world(
            click_x,
            click_y,
            display_width,
            display_height,
        );
        self.viewport.borrow_mut().center_on(target);
    }

    // === Accessors ===

    pub fn zoom(&self) -> f32 {
        self.viewport.borrow().zoom()
    }

    pub fn pan(&self) -> ScreenVector {
        self.viewport.borrow().pan()
    }

    /// Snapshot of the current gesture state.
    pub fn gesture(&self) -> Gesture {
        *self.gesture.borrow()
    }

    /// The node being dragged, if any.
    pub fn dragged_node_id(&self) -> Option<i32> {
        self.gesture.borrow().dragged_node_id()
    }

    /// Shared handle to the node store, for content edits and rendering.
    pub fn nodes(&self) -> Rc<RefCell<NodeStore>> {
        self.nodes.clone()
    }

    /// Shared handle to the connection store.
    pub fn connections(&self) -> Rc<RefCell<ConnectionStore>> {
        self.connections.clone()
    }

    /// Drain pending user-facing notifications (persistence failures).
    pub fn take_notifications(&self) -> Vec<Notification> {
        mem::take(&mut *self.notifications.borrow_mut())
    }

    /// Number of writes waiting in the queue. Zero except mid-commit, since
    /// every commit flushes immediately.
    pub fn pending_writes(&self) -> usize {
        self.queue.borrow().len()
    }

    fn flush_writes(&self) {
        let mut queue = self.queue.borrow_mut();
        let mut notifications = self.notifications.borrow_mut();
        queue.flush(self.gateway.as_ref(), &mut notifications);
    }
}

fn touch_distance(touches: &[ScreenPoint]) -> Option<f32> {
    if touches.len() < 2 {
        return None;
    }
    let delta = touches[1] - touches[0];
    Some(delta.length())
}
