//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::cell::{Cell, RefCell};

use board_canvas::{Connection, Node, PersistenceError, PersistenceGateway};

/// Gateway test double: serves seeded data on load and records every write.
///
/// Each field records calls to the corresponding gateway method with their
/// arguments. Set `fail_writes` to make every write fail the way an
/// unreachable backend would.
#[derive(Default)]
pub struct RecordingGateway {
    /// Data served by `load_nodes`.
    pub seeded_nodes: RefCell<Vec<Node>>,
    /// Data served by `load_connections`.
    pub seeded_connections: RefCell<Vec<Connection>>,

    /// (owner_id, board_id) per load_nodes call
    pub load_calls: RefCell<Vec<(String, Option<String>)>>,
    /// Nodes passed to create_node
    pub created_nodes: RefCell<Vec<Node>>,
    /// (id, x, y) per update_node_position call
    pub position_updates: RefCell<Vec<(i32, f32, f32)>>,
    /// Ids passed to delete_node
    pub deleted_nodes: RefCell<Vec<i32>>,
    /// (from, to) per create_connection call
    pub created_connections: RefCell<Vec<(i32, i32)>>,
    /// Ids passed to delete_connection
    pub deleted_connections: RefCell<Vec<i32>>,

    /// When true, every write returns an Unreachable error.
    pub fail_writes: Cell<bool>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_result(&self) -> Result<(), PersistenceError> {
        if self.fail_writes.get() {
            Err(PersistenceError::Unreachable("backend offline".into()))
        } else {
            Ok(())
        }
    }

    /// Total number of write calls received.
    pub fn write_count(&self) -> usize {
        self.created_nodes.borrow().len()
            + self.position_updates.borrow().len()
            + self.deleted_nodes.borrow().len()
            + self.created_connections.borrow().len()
            + self.deleted_connections.borrow().len()
    }
}

impl PersistenceGateway for RecordingGateway {
    fn load_nodes(
        &self,
        owner_id: &str,
        board_id: Option<&str>,
    ) -> Result<Vec<Node>, PersistenceError> {
        self.load_calls
            .borrow_mut()
            .push((owner_id.to_string(), board_id.map(|b| b.to_string())));
        Ok(self.seeded_nodes.borrow().clone())
    }

    fn load_connections(&self, _owner_id: &str) -> Result<Vec<Connection>, PersistenceError> {
        Ok(self.seeded_connections.borrow().clone())
    }

    fn create_node(&self, node: &Node) -> Result<Node, PersistenceError> {
        self.created_nodes.borrow_mut().push(node.clone());
        self.write_result().map(|_| node.clone())
    }

    fn update_node_position(&self, id: i32, x: f32, y: f32) -> Result<(), PersistenceError> {
        self.position_updates.borrow_mut().push((id, x, y));
        self.write_result()
    }

    fn delete_node(&self, id: i32) -> Result<(), PersistenceError> {
        self.deleted_nodes.borrow_mut().push(id);
        self.write_result()
    }

    fn create_connection(
        &self,
        from_node_id: i32,
        to_node_id: i32,
    ) -> Result<Connection, PersistenceError> {
        self.created_connections
            .borrow_mut()
            .push((from_node_id, to_node_id));
        self.write_result()
            .map(|_| Connection::new(0, from_node_id, to_node_id))
    }

    fn delete_connection(&self, id: i32) -> Result<(), PersistenceError> {
        self.deleted_connections.borrow_mut().push(id);
        self.write_result()
    }
}
