//! Directed connections between nodes and their invariants.
//!
//! The store enforces the model-level rules at the only place connections
//! can enter it: no self-loops, no second connection over the same
//! unordered node pair, and no endpoints that are not live nodes. Rule
//! violations are ordinary values ([`ConnectionError`]) that callers are
//! free to discard — the interaction layer rejects them silently, with no
//! user-visible error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nodes::NodeStore;

/// A directed link between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: i32,
    pub from_node_id: i32,
    pub to_node_id: i32,
}

impl Connection {
    pub fn new(id: i32, from_node_id: i32, to_node_id: i32) -> Self {
        Self {
            id,
            from_node_id,
            to_node_id,
        }
    }

    /// Whether this connection links the same unordered node pair.
    pub fn links_pair(&self, a: i32, b: i32) -> bool {
        (self.from_node_id == a && self.to_node_id == b)
            || (self.from_node_id == b && self.to_node_id == a)
    }

    /// Whether this connection touches the given node at either end.
    pub fn touches(&self, node_id: i32) -> bool {
        self.from_node_id == node_id || self.to_node_id == node_id
    }
}

/// Reasons a connection is rejected at the model layer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("cannot connect node {0} to itself")]
    SelfLoop(i32),
    #[error("nodes {0} and {1} are already connected")]
    DuplicatePair(i32, i32),
    #[error("node {0} does not exist")]
    NodeNotFound(i32),
}

/// The board's connections, with invariant enforcement and cascade pruning.
#[derive(Clone, Debug, Default)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded connections.
    ///
    /// Entries violating the invariants (self-loops, repeats of an already
    /// seen pair) are dropped rather than surfaced; persisted data is not a
    /// path for invalid state to enter the session.
    pub fn from_connections(connections: Vec<Connection>) -> Self {
        let mut store = Self::new();
        for conn in connections {
            if conn.from_node_id != conn.to_node_id
                && !store.linked(conn.from_node_id, conn.to_node_id)
            {
                store.connections.push(conn);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn get(&self, id: i32) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Whether any connection links the pair, in either direction.
    pub fn linked(&self, a: i32, b: i32) -> bool {
        self.connections.iter().any(|c| c.links_pair(a, b))
    }

    /// Check whether a new `from → to` connection would be valid.
    pub fn validate(
        &self,
        from_node_id: i32,
        to_node_id: i32,
        nodes: &NodeStore,
    ) -> Result<(), ConnectionError> {
        if from_node_id == to_node_id {
            return Err(ConnectionError::SelfLoop(from_node_id));
        }
        if nodes.get(from_node_id).is_none() {
            return Err(ConnectionError::NodeNotFound(from_node_id));
        }
        if nodes.get(to_node_id).is_none() {
            return Err(ConnectionError::NodeNotFound(to_node_id));
        }
        if self.linked(from_node_id, to_node_id) {
            return Err(ConnectionError::DuplicatePair(from_node_id, to_node_id));
        }
        Ok(())
    }

    /// Validate and store a new connection with the given id.
    pub fn create(
        &mut self,
        id: i32,
        from_node_id: i32,
        to_node_id: i32,
        nodes: &NodeStore,
    ) -> Result<Connection, ConnectionError> {
        self.validate(from_node_id, to_node_id, nodes)?;
        let conn = Connection::new(id, from_node_id, to_node_id);
        self.connections.push(conn.clone());
        Ok(conn)
    }

    pub fn remove(&mut self, id: i32) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Remove every connection touching the given node.
    ///
    /// Called when a node is deleted; returns the pruned connections so the
    /// caller can account for them.
    pub fn prune_node(&mut self, node_id: i32) -> Vec<Connection> {
        let (pruned, kept): (Vec<Connection>, Vec<Connection>) = self
            .connections
            .drain(..)
            .partition(|c| c.touches(node_id));
        self.connections = kept;
        pruned
    }

    /// Highest id currently stored, or 0 for an empty store.
    pub fn max_id(&self) -> i32 {
        self.connections.iter().map(|c| c.id).max().unwrap_or(0)
    }
}
