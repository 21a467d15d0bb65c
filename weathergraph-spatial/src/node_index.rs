//! KD-Tree node snapping (§4.3): nearest node to a coordinate, Euclidean in
//! (lat, lon) space — adequate at city scale and far cheaper than haversine
//! for the tree's own ordering.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use weathergraph_graph::{Graph, NodeIdx};

struct IndexedNode {
    idx: NodeIdx,
    osm_id: i64,
    point: [f64; 2],
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Immutable, thread-safe-for-reads index over every graph node's (lat, lon).
pub struct NodeIndex {
    tree: RTree<IndexedNode>,
}

impl NodeIndex {
    pub fn build(graph: &Graph) -> Self {
        let items = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| IndexedNode {
                idx: NodeIdx(i as u32),
                osm_id: node.osm_id,
                point: [node.lat, node.lon],
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// Nearest node to `(lat, lon)`. `None` only when the index is empty.
    /// Exact distance ties break toward the lower OSM node ID, so snapping
    /// is deterministic regardless of tree traversal order.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<NodeIdx> {
        let query = [lat, lon];
        let mut best: Option<&IndexedNode> = None;
        let mut best_dist = f64::INFINITY;

        for candidate in self.tree.nearest_neighbor_iter(&query) {
            let dist = candidate.distance_2(&query);
            if dist > best_dist + 1e-15 {
                break;
            }
            match best {
                None => {
                    best = Some(candidate);
                    best_dist = dist;
                }
                Some(current) if candidate.osm_id < current.osm_id => {
                    best = Some(candidate);
                }
                _ => {}
            }
        }

        best.map(|n| n.idx)
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathergraph_graph::types::Node;

    fn graph_with_nodes(coords: &[(i64, f64, f64)]) -> Graph {
        let nodes = coords
            .iter()
            .map(|&(id, lat, lon)| Node { osm_id: id, lat, lon })
            .collect::<Vec<_>>();
        Graph::from_parts(nodes, Vec::new())
    }

    #[test]
    fn snaps_to_the_closest_of_three_integer_longitude_nodes() {
        let graph = graph_with_nodes(&[(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 0.0, 2.0)]);
        let index = NodeIndex::build(&graph);
        let nearest = index.nearest(0.0, 1.499).unwrap();
        assert_eq!(graph.node(nearest).osm_id, 2);
    }

    #[test]
    fn ties_break_toward_lower_osm_id() {
        let graph = graph_with_nodes(&[(20, 0.0, 0.0), (10, 1.0, 0.0)]);
        let index = NodeIndex::build(&graph);
        let nearest = index.nearest(0.5, 0.0).unwrap();
        assert_eq!(graph.node(nearest).osm_id, 10);
    }

    #[test]
    fn empty_graph_returns_none() {
        let graph = graph_with_nodes(&[]);
        let index = NodeIndex::build(&graph);
        assert!(index.is_empty());
        assert!(index.nearest(0.0, 0.0).is_none());
    }
}
