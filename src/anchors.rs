//! Connection anchor points and line endpoint computation.
//!
//! Every node exposes four fixed anchors at its edge midpoints (N, S, E,
//! W) in world space. A connection renders as the line between the anchor
//! pair — one per node — with the smallest Euclidean distance, which gives
//! the visually shortest line between the two node boundaries. The
//! endpoints handed to the host are already in screen space.

use crate::connections::Connection;
use crate::nodes::{Node, NodeStore};
use crate::viewport::{ScreenPoint, Viewport, WorldPoint};

/// The four fixed anchor positions on a node's boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorSide {
    North,
    South,
    East,
    West,
}

impl AnchorSide {
    /// All sides, in the tie-breaking order used by the nearest-pair rule.
    pub const ALL: [AnchorSide; 4] = [
        AnchorSide::North,
        AnchorSide::South,
        AnchorSide::East,
        AnchorSide::West,
    ];

    /// World-space position of this anchor on the given node.
    pub fn point(self, node: &Node) -> WorldPoint {
        let (x, y) = (node.position.x, node.position.y);
        let (w, h) = (node.size.width, node.size.height);
        match self {
            AnchorSide::North => WorldPoint::new(x + w / 2.0, y),
            AnchorSide::South => WorldPoint::new(x + w / 2.0, y + h),
            AnchorSide::East => WorldPoint::new(x + w, y + h / 2.0),
            AnchorSide::West => WorldPoint::new(x, y + h / 2.0),
        }
    }
}

fn distance_sq(a: WorldPoint, b: WorldPoint) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Select the anchor pair (one side per node) minimizing the distance
/// between the two anchor points. Ties resolve to the first minimal pair
/// in [`AnchorSide::ALL`] order.
pub fn nearest_anchor_pair(a: &Node, b: &Node) -> (AnchorSide, AnchorSide) {
    let mut best = (AnchorSide::North, AnchorSide::North);
    let mut best_dist = f32::INFINITY;
    for side_a in AnchorSide::ALL {
        let pa = side_a.point(a);
        for side_b in AnchorSide::ALL {
            let d = distance_sq(pa, side_b.point(b));
            if d < best_dist {
                best_dist = d;
                best = (side_a, side_b);
            }
        }
    }
    best
}

/// The anchor on `node` closest to an arbitrary world point. Used for the
/// live preview line while a connection is being drawn.
pub fn nearest_anchor_to_point(node: &Node, p: WorldPoint) -> AnchorSide {
    let mut best = AnchorSide::North;
    let mut best_dist = f32::INFINITY;
    for side in AnchorSide::ALL {
        let d = distance_sq(side.point(node), p);
        if d < best_dist {
            best_dist = d;
            best = side;
        }
    }
    best
}

/// Screen-space endpoints for one connection's line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionLine {
    pub id: i32,
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

/// Compute the screen-space line for a connection.
///
/// Returns `None` when either endpoint node is missing; the renderer just
/// skips the line for that frame.
pub fn connection_line(
    conn: &Connection,
    nodes: &NodeStore,
    viewport: &Viewport,
) -> Option<ConnectionLine> {
    let from_node = nodes.get(conn.from_node_id)?;
    let to_node = nodes.get(conn.to_node_id)?;
    let (from_side, to_side) = nearest_anchor_pair(from_node, to_node);
    Some(ConnectionLine {
        id: conn.id,
        from: viewport.world_to_screen(from_side.point(from_node)),
        to: viewport.world_to_screen(to_side.point(to_node)),
    })
}

/// Compute the screen-space preview line from a node toward the pointer
/// while a connection is being drawn.
pub fn preview_line(
    from_node: &Node,
    cursor: WorldPoint,
    viewport: &Viewport,
) -> (ScreenPoint, ScreenPoint) {
    let side = nearest_anchor_to_point(from_node, cursor);
    (
        viewport.world_to_screen(side.point(from_node)),
        viewport.world_to_screen(cursor),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{ScreenVector, WorldSize};

    fn node_at(id: i32, x: f32, y: f32) -> Node {
        let mut n = Node::new(id, WorldPoint::new(x, y), "#ccc", "n");
        n.size = WorldSize::new(100.0, 50.0);
        n
    }

    // ========================================================================
    // Anchor positions
    // ========================================================================

    #[test]
    fn test_anchor_points_are_edge_midpoints() {
        let n = node_at(1, 100.0, 200.0);
        assert_eq!(AnchorSide::North.point(&n), WorldPoint::new(150.0, 200.0));
        assert_eq!(AnchorSide::South.point(&n), WorldPoint::new(150.0, 250.0));
        assert_eq!(AnchorSide::East.point(&n), WorldPoint::new(200.0, 225.0));
        assert_eq!(AnchorSide::West.point(&n), WorldPoint::new(100.0, 225.0));
    }

    // ========================================================================
    // Nearest pair selection
    // ========================================================================

    #[test]
    fn test_side_by_side_nodes_use_facing_anchors() {
        let a = node_at(1, 100.0, 100.0);
        let b = node_at(2, 400.0, 100.0);
        assert_eq!(nearest_anchor_pair(&a, &b), (AnchorSide::East, AnchorSide::West));
        assert_eq!(nearest_anchor_pair(&b, &a), (AnchorSide::West, AnchorSide::East));
    }

    #[test]
    fn test_stacked_nodes_use_facing_anchors() {
        let a = node_at(1, 100.0, 100.0);
        let b = node_at(2, 100.0, 400.0);
        assert_eq!(nearest_anchor_pair(&a, &b), (AnchorSide::South, AnchorSide::North));
    }

    #[test]
    fn test_diagonal_nodes_pick_shortest_combination() {
        let a = node_at(1, 0.0, 0.0);
        let b = node_at(2, 400.0, 400.0);
        let (sa, sb) = nearest_anchor_pair(&a, &b);
        let chosen = distance_sq(sa.point(&a), sb.point(&b));
        for side_a in AnchorSide::ALL {
            for side_b in AnchorSide::ALL {
                assert!(chosen <= distance_sq(side_a.point(&a), side_b.point(&b)));
            }
        }
    }

    #[test]
    fn test_nearest_anchor_to_point() {
        let n = node_at(1, 100.0, 100.0);
        assert_eq!(
            nearest_anchor_to_point(&n, WorldPoint::new(500.0, 125.0)),
            AnchorSide::East
        );
        assert_eq!(
            nearest_anchor_to_point(&n, WorldPoint::new(150.0, 0.0)),
            AnchorSide::North
        );
    }

    // ========================================================================
    // Line computation
    // ========================================================================

    #[test]
    fn test_connection_line_screen_space() {
        let mut nodes = NodeStore::new();
        nodes.insert(node_at(1, 100.0, 100.0));
        nodes.insert(node_at(2, 400.0, 100.0));
        let conn = Connection::new(7, 1, 2);

        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        viewport.set_pan(ScreenVector::new(10.0, 20.0));

        let line = connection_line(&conn, &nodes, &viewport).unwrap();
        assert_eq!(line.id, 7);
        // East anchor of node 1 is world (200, 125) -> screen (410, 270).
        assert_eq!(line.from, ScreenPoint::new(410.0, 270.0));
        // West anchor of node 2 is world (400, 125) -> screen (810, 270).
        assert_eq!(line.to, ScreenPoint::new(810.0, 270.0));
    }

    #[test]
    fn test_connection_line_missing_node() {
        let mut nodes = NodeStore::new();
        nodes.insert(node_at(1, 0.0, 0.0));
        let conn = Connection::new(1, 1, 99);
        assert!(connection_line(&conn, &nodes, &Viewport::new()).is_none());
    }

    #[test]
    fn test_preview_line_tracks_cursor() {
        let n = node_at(1, 100.0, 100.0);
        let (from, to) = preview_line(&n, WorldPoint::new(600.0, 125.0), &Viewport::new());
        assert_eq!(from, ScreenPoint::new(200.0, 125.0)); // east anchor
        assert_eq!(to, ScreenPoint::new(600.0, 125.0));
    }
}
