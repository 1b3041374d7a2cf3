//! Content nodes and the store that owns them.
//!
//! A [`Node`] is a placed piece of board content: a world-space rectangle
//! with a color, a title, and an opaque structured payload. The
//! [`NodeStore`] keeps nodes in insertion order (which is also render
//! order) and is the single authority for position mutation, so the
//! "positions never go negative" invariant holds no matter which input
//! path moved the node.

use serde::{Deserialize, Serialize};

use crate::hit_test::NodeGeometry;
use crate::viewport::{WorldPoint, WorldSize};

/// Default node width when a caller provides no usable size.
pub const DEFAULT_NODE_WIDTH: f32 = 200.0;
/// Default node height when a caller provides no usable size.
pub const DEFAULT_NODE_HEIGHT: f32 = 120.0;

/// A content node placed on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i32,
    /// Top-left corner in world units; both axes are kept ≥ 0.
    pub position: WorldPoint,
    /// Extent in world units; both axes are kept > 0.
    pub size: WorldSize,
    /// Display color, an opaque string the host interprets (e.g. `"#ffd166"`).
    pub color: String,
    pub title: String,
    /// Structured content produced by collaborators outside this crate.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Node {
    /// Create a node with the default size and an empty payload.
    ///
    /// The position is clamped into the non-negative quadrant.
    pub fn new(id: i32, position: WorldPoint, color: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            position: clamp_position(position),
            size: WorldSize::new(DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT),
            color: color.into(),
            title: title.into(),
            payload: serde_json::Value::Null,
        }
    }

    /// Center of the node's rectangle in world space.
    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Whether a world-space point falls inside the node's rectangle
    /// (edges inclusive).
    pub fn contains(&self, p: WorldPoint) -> bool {
        p.x >= self.position.x
            && p.x <= self.position.x + self.size.width
            && p.y >= self.position.y
            && p.y <= self.position.y + self.size.height
    }
}

impl NodeGeometry for Node {
    fn id(&self) -> i32 {
        self.id
    }

    fn rect(&self) -> (f32, f32, f32, f32) {
        (
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
        )
    }
}

fn clamp_position(p: WorldPoint) -> WorldPoint {
    let sane = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    WorldPoint::new(sane(p.x), sane(p.y))
}

fn sanitize(mut node: Node) -> Node {
    node.position = clamp_position(node.position);
    if !(node.size.width > 0.0) || !(node.size.height > 0.0) {
        node.size = WorldSize::new(DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT);
    }
    node
}

/// Ordered collection of the board's nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded nodes, sanitizing each entry.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes.into_iter().map(sanitize).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion (render) order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn get(&self, id: i32) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mutable access for content edits (title, color, payload).
    ///
    /// Position changes should go through [`set_position`](Self::set_position)
    /// so clamping applies.
    pub fn get_mut(&mut self, id: i32) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Insert a node, replacing any existing node with the same id.
    pub fn insert(&mut self, node: Node) {
        let node = sanitize(node);
        match self.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    /// Move a node, clamping the position into the non-negative quadrant.
    ///
    /// Returns false if no node has the given id.
    pub fn set_position(&mut self, id: i32, position: WorldPoint) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = clamp_position(position);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i32) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(index))
    }

    /// Highest id currently stored, or 0 for an empty store. Used to seed
    /// session-local id assignment past loaded data.
    pub fn max_id(&self) -> i32 {
        self.nodes.iter().map(|n| n.id).max().unwrap_or(0)
    }
}
