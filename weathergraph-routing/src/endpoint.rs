//! Endpoint resolution: integer node ID, coordinate pair, or free-text
//! address, each reduced to a graph node.

use weathergraph_common::{Error, Result};
use weathergraph_graph::NodeIdx;

use crate::context::Context;

#[derive(Debug, Clone)]
pub enum Endpoint {
    NodeId(i64),
    Coords(f64, f64),
    Address(String),
}

#[derive(Debug, Clone)]
pub struct ResolvedEndpoint {
    pub node: NodeIdx,
    pub osm_id: i64,
    pub snapped: bool,
    pub matched_address: Option<String>,
    pub score: Option<f64>,
}

/// An address match at or above this score is trusted directly (fast
/// path); below it, the matched coordinates are re-snapped via the KD-Tree
/// (safe path) rather than trusting the text match's own node.
const ADDRESS_FAST_PATH_THRESHOLD: f64 = 80.0;

pub fn resolve(ctx: &Context, endpoint: &Endpoint) -> Result<ResolvedEndpoint> {
    match endpoint {
        Endpoint::NodeId(id) => {
            let node = ctx.graph.index_of(*id).ok_or(Error::UnknownEndpoint(*id))?;
            Ok(ResolvedEndpoint {
                node,
                osm_id: *id,
                snapped: false,
                matched_address: None,
                score: None,
            })
        }
        Endpoint::Coords(lat, lon) => {
            let node = ctx
                .spatial
                .nodes
                .nearest(*lat, *lon)
                .ok_or(Error::SnapFailure { lat: *lat, lon: *lon })?;
            Ok(ResolvedEndpoint {
                node,
                osm_id: ctx.graph.node(node).osm_id,
                snapped: true,
                matched_address: None,
                score: None,
            })
        }
        Endpoint::Address(text) => {
            let matches = ctx.addresses.search(text, 1);
            let Some(top) = matches.first() else {
                return Err(Error::GeocodeMiss(text.clone()));
            };
            let entry = ctx.addresses.entry(top.entry_index);

            if top.score >= ADDRESS_FAST_PATH_THRESHOLD {
                Ok(ResolvedEndpoint {
                    node: entry.node,
                    osm_id: ctx.graph.node(entry.node).osm_id,
                    snapped: false,
                    matched_address: Some(entry.address_text.clone()),
                    score: Some(top.score),
                })
            } else {
                let node = ctx
                    .spatial
                    .nodes
                    .nearest(entry.lat, entry.lon)
                    .ok_or(Error::SnapFailure { lat: entry.lat, lon: entry.lon })?;
                Ok(ResolvedEndpoint {
                    node,
                    osm_id: ctx.graph.node(node).osm_id,
                    snapped: true,
                    matched_address: Some(entry.address_text.clone()),
                    score: Some(top.score),
                })
            }
        }
    }
}
