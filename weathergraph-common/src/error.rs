//! Shared error type for the weathergraph workspace.
//!
//! Every core crate returns `weathergraph_common::Result<T>`; the HTTP and
//! CLI boundaries are the only places that convert into `anyhow`.

use thiserror::Error;

/// Errors surfaced by the routing core, per the error-handling design.
#[derive(Debug, Error)]
pub enum Error {
    /// All Overpass endpoints unreachable; fatal at startup.
    #[error("OSM ingest failed: {0}")]
    IngestFailure(String),

    /// LSCC is empty after filtering; fatal at startup.
    #[error("graph is empty after LSCC extraction")]
    EmptyGraph,

    /// Supplied node ID absent from the graph.
    #[error("node {0} is not present in the graph")]
    UnknownEndpoint(i64),

    /// KD-Tree returned nothing, or nearest node exceeded the soft limit.
    #[error("could not snap coordinate ({lat}, {lon}) to the graph")]
    SnapFailure { lat: f64, lon: f64 },

    /// Address search found nothing.
    #[error("no address matches query {0:?}")]
    GeocodeMiss(String),

    /// Origin resolved equal to destination.
    #[error("origin and destination resolve to the same node {0}")]
    SameEndpoint(i64),

    /// A* exhausted the open set without reaching the target.
    #[error("no path exists between {source} and {target}")]
    NoPath { source: i64, target: i64 },

    /// Per-query time budget was exceeded.
    #[error("query exceeded its time budget after visiting {nodes_visited} nodes")]
    Timeout { nodes_visited: usize },

    /// Malformed request input (bad coordinate pair, empty query string, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
