//! Spatial indices over the immutable road graph: KD-Tree node snapping and
//! an STRtree of edge bounding boxes for obstruction queries.

pub mod edge_index;
pub mod node_index;

pub use edge_index::EdgeIndex;
pub use node_index::NodeIndex;

use weathergraph_graph::Graph;

/// Both indices, built once at startup and held immutable for the process
/// lifetime alongside the graph they index.
pub struct SpatialIndex {
    pub nodes: NodeIndex,
    pub edges: EdgeIndex,
}

impl SpatialIndex {
    pub fn build(graph: &Graph) -> Self {
        Self {
            nodes: NodeIndex::build(graph),
            edges: EdgeIndex::build(graph),
        }
    }
}
