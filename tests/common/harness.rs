//! Test harness for board interaction tests.
//!
//! Wires a [`BoardController`] to a [`RecordingGateway`] with an 800×600
//! container and helper methods for simulating user interactions. At the
//! default viewport (zoom 1, pan 0) screen and world coordinates coincide,
//! which keeps gesture tests readable.

#![allow(dead_code)]

use std::rc::Rc;

use board_canvas::{
    BoardController, Connection, Node, PointerButton, ScreenPoint, ScreenSize, WorldPoint,
};

use super::RecordingGateway;

/// Standard test harness: controller plus its recording gateway.
pub struct BoardHarness {
    pub board: BoardController,
    pub gateway: Rc<RecordingGateway>,
}

/// Build a node the way the seeded boards do.
pub fn test_node(id: i32, x: f32, y: f32) -> Node {
    Node::new(id, WorldPoint::new(x, y), "#ffd166", format!("Node {}", id))
}

impl BoardHarness {
    /// Harness over an empty board.
    pub fn new() -> Self {
        Self::with_board(Vec::new(), Vec::new())
    }

    /// Harness with the standard two-node board: Node 1 at (100, 100) and
    /// Node 2 at (400, 100).
    pub fn with_default_nodes() -> Self {
        Self::with_board(
            vec![test_node(1, 100.0, 100.0), test_node(2, 400.0, 100.0)],
            Vec::new(),
        )
    }

    /// Harness with custom seeded nodes and connections, loaded through the
    /// gateway the way a real session starts.
    pub fn with_board(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        let gateway = Rc::new(RecordingGateway::new());
        *gateway.seeded_nodes.borrow_mut() = nodes;
        *gateway.seeded_connections.borrow_mut() = connections;

        let board = BoardController::new(gateway.clone(), "owner-1");
        board.load().expect("seeded load cannot fail");
        board.set_container_size(ScreenSize::new(800.0, 600.0));
        Self { board, gateway }
    }

    // === Pointer helpers (screen space) ===

    pub fn press(&self, x: f32, y: f32) {
        self.board
            .handle_pointer_pressed(ScreenPoint::new(x, y), PointerButton::Left);
    }

    pub fn press_middle(&self, x: f32, y: f32) {
        self.board
            .handle_pointer_pressed(ScreenPoint::new(x, y), PointerButton::Middle);
    }

    pub fn move_to(&self, x: f32, y: f32) {
        self.board.handle_pointer_moved(ScreenPoint::new(x, y));
    }

    pub fn release(&self, x: f32, y: f32) {
        self.board.handle_pointer_released(ScreenPoint::new(x, y));
    }

    pub fn cancel(&self) {
        self.board.handle_pointer_cancelled();
    }

    /// Full press-move-release drag.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.press(from.0, from.1);
        self.move_to(to.0, to.1);
        self.release(to.0, to.1);
    }

    // === State shortcuts ===

    pub fn node_position(&self, id: i32) -> WorldPoint {
        self.board
            .nodes()
            .borrow()
            .get(id)
            .expect("node exists")
            .position
    }

    pub fn connection_count(&self) -> usize {
        self.board.connections().borrow().len()
    }
}
