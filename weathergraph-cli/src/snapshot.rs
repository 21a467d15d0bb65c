//! Bincode snapshot of a fully built `Context`: the compressed graph plus
//! its extracted address entries. Reloading a snapshot skips OSM ingest and
//! graph construction (LSCC, compression); only the spatial and address
//! indices, which are cheap and deterministic, are rebuilt in memory.

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use weathergraph_geocode::AddressEntry;
use weathergraph_graph::Graph;
use weathergraph_routing::Context;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    graph: Graph,
    address_entries: Vec<AddressEntry>,
}

pub fn save(path: &Path, ctx: &Context) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let snapshot = Snapshot {
        graph: ctx.graph.clone(),
        address_entries: ctx.addresses.entries().to_vec(),
    };
    let bytes = bincode::serialize(&snapshot).context("serializing graph snapshot")?;
    std::fs::write(path, bytes).with_context(|| format!("writing snapshot to {}", path.display()))
}

pub fn load(path: &Path) -> Result<Context> {
    let bytes = std::fs::read(path).with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot: Snapshot = bincode::deserialize(&bytes).context("deserializing graph snapshot")?;
    Ok(Context::from_snapshot(snapshot.graph, snapshot.address_entries))
}
