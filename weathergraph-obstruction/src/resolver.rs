//! §4.4: turn GeoJSON features into the (blocked set, penalty map) overlay.

use geo::{BoundingRect, Intersects, LineString};
use geojson::Feature;
use rstar::AABB;
use tracing::warn;
use weathergraph_graph::Graph;
use weathergraph_spatial::EdgeIndex;

use crate::model::Overlay;

/// Penalty applied to a flood feature that specifies no `properties.penalty`.
const DEFAULT_FLOOD_PENALTY: f64 = 5.0;

/// A flood feature with penalty at or above this is treated as a hard block
/// rather than a multiplier.
const FLOOD_HARD_BLOCK_THRESHOLD: f64 = 100.0;

/// Resolve a batch of GeoJSON obstruction features (blocking polygons and
/// flood zones alike — the caller concatenates both lists) into an overlay.
/// Features with unparseable geometry are skipped with a warning rather than
/// failing the whole query.
pub fn resolve(graph: &Graph, index: &EdgeIndex, features: &[Feature]) -> Overlay {
    let mut overlay = Overlay::default();

    for feature in features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let parsed: Result<geo::Geometry<f64>, _> = geo::Geometry::try_from(geometry.clone());
        let shape = match parsed {
            Ok(g) => g,
            Err(e) => {
                warn!(error = %e, "skipping obstruction feature with unparseable geometry");
                continue;
            }
        };
        let Some(bounds) = shape.bounding_rect() else {
            continue;
        };
        let envelope = AABB::from_corners(
            [bounds.min().x, bounds.min().y],
            [bounds.max().x, bounds.max().y],
        );

        let is_flood = feature
            .property("blockType")
            .and_then(|v| v.as_str())
            .map(|s| s == "flood")
            .unwrap_or(false);
        let penalty = feature.property("penalty").and_then(|v| v.as_f64());

        for edge_idx in index.candidates(envelope) {
            let edge = graph.edge(edge_idx);
            let line = LineString::from(edge.polyline.clone());
            if !shape.intersects(&line) {
                continue;
            }

            if is_flood {
                let p = penalty.unwrap_or(DEFAULT_FLOOD_PENALTY);
                if p >= FLOOD_HARD_BLOCK_THRESHOLD {
                    overlay.block(edge_idx);
                } else {
                    overlay.add_penalty(edge_idx, p);
                }
            } else {
                overlay.block(edge_idx);
            }
        }
    }

    overlay
}
