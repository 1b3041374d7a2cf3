//! The persistence boundary: gateway trait, write queue, notifications.
//!
//! The board is local-first. Every commit updates the in-memory stores
//! immediately and enqueues a durable write; the queue is flushed
//! fire-and-forget right after. A failed write surfaces a transient
//! [`Notification`] and is dropped — no retry, no rollback, no
//! reconciliation. That policy is deliberate: the session is the only
//! writer, and a stale remote copy is preferable to interrupting the
//! interaction.
//!
//! The queue is an idempotent upsert keyed by entity, so if a host ever
//! layers retries on top, replaying a flush cannot double-apply an
//! operation.

use thiserror::Error;

use crate::connections::Connection;
use crate::nodes::Node;

/// Failure reported by the persistence backend.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("persistence backend unreachable: {0}")]
    Unreachable(String),
    #[error("write rejected by persistence backend: {0}")]
    Rejected(String),
}

/// Durable storage for boards, implemented by the host.
///
/// All reads and writes are scoped by an opaque owner identifier; boards
/// may additionally be grouped by an optional board identifier. Adapters
/// that talk to an async backend are expected to enqueue and acknowledge —
/// the interaction layer never waits on them.
pub trait PersistenceGateway {
    fn load_nodes(&self, owner_id: &str, board_id: Option<&str>)
        -> Result<Vec<Node>, PersistenceError>;

    fn load_connections(&self, owner_id: &str) -> Result<Vec<Connection>, PersistenceError>;

    /// Persist a new node. The returned node is an acknowledgement; the
    /// session keeps using its own id.
    fn create_node(&self, node: &Node) -> Result<Node, PersistenceError>;

    fn update_node_position(&self, id: i32, x: f32, y: f32) -> Result<(), PersistenceError>;

    /// Delete a node. Pruning dependent connections locally is the
    /// caller's responsibility.
    fn delete_node(&self, id: i32) -> Result<(), PersistenceError>;

    fn create_connection(
        &self,
        from_node_id: i32,
        to_node_id: i32,
    ) -> Result<Connection, PersistenceError>;

    fn delete_connection(&self, id: i32) -> Result<(), PersistenceError>;
}

/// A transient, non-blocking message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    fn write_failed(what: &str, err: &PersistenceError) -> Self {
        Self {
            message: format!("Could not save {}: {}", what, err),
        }
    }
}

/// One pending durable write.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteOp {
    CreateNode(Node),
    UpdateNodePosition { id: i32, x: f32, y: f32 },
    DeleteNode { id: i32 },
    CreateConnection { id: i32, from_node_id: i32, to_node_id: i32 },
    DeleteConnection { id: i32 },
}

/// Entity a write applies to; the upsert key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriteKey {
    Node(i32),
    Connection(i32),
}

impl WriteOp {
    fn key(&self) -> WriteKey {
        match self {
            WriteOp::CreateNode(node) => WriteKey::Node(node.id),
            WriteOp::UpdateNodePosition { id, .. } => WriteKey::Node(*id),
            WriteOp::DeleteNode { id } => WriteKey::Node(*id),
            WriteOp::CreateConnection { id, .. } => WriteKey::Connection(*id),
            WriteOp::DeleteConnection { id } => WriteKey::Connection(*id),
        }
    }

    fn entity_kind(&self) -> &'static str {
        match self {
            WriteOp::CreateNode(_) | WriteOp::UpdateNodePosition { .. } | WriteOp::DeleteNode { .. } => {
                "node"
            }
            _ => "connection",
        }
    }
}

/// Pending durable writes, coalesced per entity.
#[derive(Clone, Debug, Default)]
pub struct WriteQueue {
    ops: Vec<WriteOp>,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.ops.iter()
    }

    /// Enqueue a write, coalescing against pending writes for the same
    /// entity:
    ///
    /// - a position update folds into a still-pending create of the same
    ///   node instead of replacing it;
    /// - a delete discards every pending write for the entity before
    ///   enqueueing;
    /// - otherwise a pending write with the same key is replaced in place,
    ///   which is what makes replaying a flush idempotent.
    pub fn push(&mut self, op: WriteOp) {
        let key = op.key();

        if let WriteOp::UpdateNodePosition { id, x, y } = op {
            if let Some(WriteOp::CreateNode(node)) = self
                .ops
                .iter_mut()
                .find(|pending| matches!(pending, WriteOp::CreateNode(n) if n.id == id))
            {
                node.position = crate::viewport::WorldPoint::new(x.max(0.0), y.max(0.0));
                return;
            }
        }

        if matches!(op, WriteOp::DeleteNode { .. } | WriteOp::DeleteConnection { .. }) {
            self.ops.retain(|pending| pending.key() != key);
            self.ops.push(op);
            return;
        }

        match self.ops.iter_mut().find(|pending| pending.key() == key) {
            Some(pending) => *pending = op,
            None => self.ops.push(op),
        }
    }

    /// Drain every pending write into the gateway, in order.
    ///
    /// Failures are logged, converted into notifications, and dropped;
    /// local state is never rolled back.
    pub fn flush(&mut self, gateway: &dyn PersistenceGateway, notifications: &mut Vec<Notification>) {
        for op in self.ops.drain(..) {
            let result = match &op {
                WriteOp::CreateNode(node) => gateway.create_node(node).map(|_| ()),
                WriteOp::UpdateNodePosition { id, x, y } => {
                    gateway.update_node_position(*id, *x, *y)
                }
                WriteOp::DeleteNode { id } => gateway.delete_node(*id),
                WriteOp::CreateConnection {
                    from_node_id,
                    to_node_id,
                    ..
                } => gateway.create_connection(*from_node_id, *to_node_id).map(|_| ()),
                WriteOp::DeleteConnection { id } => gateway.delete_connection(*id),
            };
            if let Err(err) = result {
                log::warn!("durable write failed, keeping local state: {}", err);
                notifications.push(Notification::write_failed(op.entity_kind(), &err));
            }
        }
    }
}
