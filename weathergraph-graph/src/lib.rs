//! Graph builder: way filter → raw directed graph → LSCC → degree-2
//! compression → final immutable [`Graph`].

pub mod compress;
pub mod raw;
pub mod scc;
pub mod types;

pub use types::{Edge, EdgeIdx, Graph, Node, NodeIdx};

use rustc_hash::FxHashMap;
use tracing::info;
use weathergraph_common::{Error, Result};
use weathergraph_osm::OsmData;

/// Run the full pipeline over parsed OSM data and produce the final graph.
/// Fails with [`Error::EmptyGraph`] if nothing survives LSCC extraction.
pub fn build(osm: &OsmData) -> Result<Graph> {
    let raw_graph = raw::build_raw_graph(osm);
    info!(
        raw_nodes = raw_graph.node_coords.len(),
        raw_edges = raw_graph.edges.len(),
        "raw graph built"
    );

    let lscc = scc::largest_scc(&raw_graph);
    info!(
        retained_nodes = lscc.retained.len(),
        discarded_components = lscc.discarded_components,
        discarded_nodes = lscc.discarded_nodes,
        "LSCC extracted"
    );

    if lscc.retained.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let (final_ids, compressed_edges) = compress::compress(&lscc.retained, &raw_graph.edges);
    if final_ids.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let mut sorted_ids: Vec<i64> = final_ids.into_iter().collect();
    sorted_ids.sort_unstable();

    let mut id_to_index: FxHashMap<i64, NodeIdx> = FxHashMap::default();
    let mut nodes = Vec::with_capacity(sorted_ids.len());
    for (i, &osm_id) in sorted_ids.iter().enumerate() {
        let (lon, lat) = raw_graph.node_coords[&osm_id];
        id_to_index.insert(osm_id, NodeIdx(i as u32));
        nodes.push(Node { osm_id, lat, lon });
    }

    let mut adjacency = vec![Vec::new(); nodes.len()];
    let mut edges = Vec::with_capacity(compressed_edges.len());
    for c in compressed_edges {
        let source = id_to_index[&c.from];
        let target = id_to_index[&c.to];
        let edge_idx = EdgeIdx(edges.len() as u32);
        adjacency[source.0 as usize].push(edge_idx);
        edges.push(Edge {
            source,
            target,
            way_id: c.way_id,
            polyline: c.polyline,
            length_m: c.length_m,
            class: c.class,
            name: c.name,
            speed_kmh: c.class.speed_kmh(),
            c_highway: c.class.c_highway(),
        });
    }

    let heuristic_constant = weathergraph_weights::min_coefficient_product();

    info!(
        final_nodes = nodes.len(),
        final_edges = edges.len(),
        heuristic_constant,
        "compression complete"
    );

    Ok(Graph {
        nodes,
        edges,
        adjacency,
        id_to_index,
        heuristic_constant,
    })
}
