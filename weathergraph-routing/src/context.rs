//! The process-wide immutable context: graph, spatial indices and address
//! index, built once at startup and shared (read-only) across concurrent
//! queries. Re-architected as an explicit value rather than process-global
//! state, so callers (HTTP handlers, CLI commands, tests) construct and own
//! it themselves instead of reaching for ambient statics.

use weathergraph_common::Result;
use weathergraph_geocode::{AddressEntry, AddressIndex};
use weathergraph_graph::Graph;
use weathergraph_osm::OsmData;
use weathergraph_spatial::SpatialIndex;

pub struct Context {
    pub graph: Graph,
    pub spatial: SpatialIndex,
    pub addresses: AddressIndex,
}

impl Context {
    /// Run the full build pipeline: graph construction, spatial indices,
    /// then address extraction and indexing.
    pub fn build(osm: &OsmData) -> Result<Self> {
        let graph = weathergraph_graph::build(osm)?;
        let spatial = SpatialIndex::build(&graph);
        let address_entries = weathergraph_geocode::extract(osm, &graph, &spatial.nodes);
        let addresses = AddressIndex::build(address_entries);

        Ok(Self { graph, spatial, addresses })
    }

    /// Reconstruct a context from an already-built graph and its extracted
    /// address entries, rebuilding only the (cheap, deterministic) spatial
    /// and address indices. Used to restore a cached snapshot without
    /// re-ingesting OSM data or re-running LSCC/compression.
    pub fn from_snapshot(graph: Graph, address_entries: Vec<AddressEntry>) -> Self {
        let spatial = SpatialIndex::build(&graph);
        let addresses = AddressIndex::build(address_entries);
        Self { graph, spatial, addresses }
    }
}
