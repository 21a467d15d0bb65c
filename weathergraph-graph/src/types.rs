//! The final graph representation: two parallel arrays (nodes, edges)
//! addressed by integer index, plus an adjacency list of outgoing edge
//! indices per node. No owning references back and forth, so no cycles in
//! ownership even though the road network itself is cyclic.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use weathergraph_weights::HighwayClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIdx(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeIdx(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Original OSM node ID. Stable across rebuilds of the same bbox.
    pub osm_id: i64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeIdx,
    pub target: NodeIdx,
    /// OSM way this edge (or, post-compression, its first segment) came from.
    pub way_id: i64,
    /// Ordered (lon, lat) pairs; length ≥ 2, oriented source → target.
    pub polyline: Vec<(f64, f64)>,
    pub length_m: f64,
    pub class: HighwayClass,
    pub name: Option<String>,
    pub speed_kmh: f64,
    pub c_highway: f64,
}

impl Edge {
    /// Free-flow travel time in seconds.
    pub fn duration_s(&self) -> f64 {
        self.length_m / (self.speed_kmh * 1000.0 / 3600.0)
    }
}

/// The immutable, read-only road graph built once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Outgoing edge indices per node, indexed by `NodeIdx`.
    pub adjacency: Vec<Vec<EdgeIdx>>,
    /// OSM node ID → index in `nodes`, for resolving integer endpoints.
    pub(crate) id_to_index: FxHashMap<i64, NodeIdx>,
    /// Derived at build time from the live `c_highway`/`c_context` tables;
    /// the A* heuristic multiplies haversine distance by this value.
    pub heuristic_constant: f64,
}

impl Graph {
    /// Build a graph directly from nodes and edges, deriving the OSM-ID
    /// index, adjacency lists and heuristic constant. Used by the pipeline
    /// builder and by other crates' tests that need a small hand-built
    /// graph without going through OSM ingest.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut id_to_index = FxHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            id_to_index.insert(node.osm_id, NodeIdx(i as u32));
        }
        let mut adjacency = vec![Vec::new(); nodes.len()];
        for (i, edge) in edges.iter().enumerate() {
            adjacency[edge.source.0 as usize].push(EdgeIdx(i as u32));
        }
        let heuristic_constant = weathergraph_weights::min_coefficient_product();
        Graph {
            nodes,
            edges,
            adjacency,
            id_to_index,
            heuristic_constant,
        }
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.0 as usize]
    }

    pub fn edge(&self, idx: EdgeIdx) -> &Edge {
        &self.edges[idx.0 as usize]
    }

    pub fn outgoing(&self, idx: NodeIdx) -> &[EdgeIdx] {
        &self.adjacency[idx.0 as usize]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Resolve an OSM node ID to its index in the final graph, if retained.
    pub fn index_of(&self, osm_id: i64) -> Option<NodeIdx> {
        self.id_to_index.get(&osm_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
