//! Geometry stitching: concatenate the polylines of the edges on a path,
//! in traversal order, dropping a new segment's first point when it
//! coincides with the accumulated polyline's last point.
//!
//! Edges in this graph are stored pre-oriented (`polyline` always runs
//! `source → target`), so there is no reversal to perform here — unlike a
//! representation that shares one polyline between both travel directions.
//! The cursor is still threaded through explicitly and checked in debug
//! builds, because a compressed edge's `source`/`target` are exactly the
//! retained nodes a hairpin chain bends between, and a silent mismatch here
//! is the zig-zag bug this step exists to prevent.

use weathergraph_common::geo::coords_close;
use weathergraph_graph::{EdgeIdx, Graph, NodeIdx};

/// Concatenate the polylines of `edges`, an ordered path from `source` to
/// wherever the last edge's target lands.
pub fn stitch_polyline(graph: &Graph, source: NodeIdx, edges: &[EdgeIdx]) -> Vec<(f64, f64)> {
    let mut polyline = Vec::new();
    let mut cursor = source;

    for &edge_idx in edges {
        let edge = graph.edge(edge_idx);
        debug_assert_eq!(
            edge.source.0, cursor.0,
            "path edge does not start at the current cursor; traversal order is broken"
        );

        for (i, &point) in edge.polyline.iter().enumerate() {
            if i == 0 {
                if let Some(&last) = polyline.last() {
                    if coords_close(last, point) {
                        continue;
                    }
                }
            }
            polyline.push(point);
        }

        cursor = edge.target;
    }

    polyline
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathergraph_graph::types::{Edge, Node};
    use weathergraph_weights::HighwayClass;

    fn edge(source: NodeIdx, target: NodeIdx, polyline: Vec<(f64, f64)>) -> Edge {
        Edge {
            source,
            target,
            way_id: 1,
            polyline,
            length_m: 1.0,
            class: HighwayClass::Residential,
            name: None,
            speed_kmh: 30.0,
            c_highway: 1.2,
        }
    }

    #[test]
    fn drops_duplicate_join_points() {
        let nodes = vec![
            Node { osm_id: 1, lat: 0.0, lon: 0.0 },
            Node { osm_id: 2, lat: 0.0, lon: 1.0 },
            Node { osm_id: 3, lat: 0.0, lon: 2.0 },
        ];
        let edges = vec![
            edge(NodeIdx(0), NodeIdx(1), vec![(0.0, 0.0), (1.0, 0.0)]),
            edge(NodeIdx(1), NodeIdx(2), vec![(1.0, 0.0), (2.0, 0.0)]),
        ];
        let graph = Graph::from_parts(nodes, edges);

        let merged = stitch_polyline(&graph, NodeIdx(0), &[EdgeIdx(0), EdgeIdx(1)]);
        assert_eq!(merged, vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    }
}
