//! §4.5: weighted A* with a per-query blocking/penalty overlay.

use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use weathergraph_common::geo::haversine_distance;
use weathergraph_common::{Error, Result};
use weathergraph_graph::{EdgeIdx, Graph, NodeIdx};
use weathergraph_obstruction::Overlay;
use weathergraph_weights::{c_context, Weather};

use crate::frontier::FrontierEntry;
use crate::stitch::stitch_polyline;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes_visited: usize,
    pub wall_time: Duration,
}

#[derive(Debug, Clone)]
pub struct PathResult {
    pub nodes: Vec<NodeIdx>,
    pub polyline: Vec<(f64, f64)>,
    pub length_m: f64,
    pub duration_s: f64,
    pub stats: SearchStats,
}

fn weight(graph: &Graph, edge_idx: EdgeIdx, weather: Weather, overlay: &Overlay) -> f64 {
    let edge = graph.edge(edge_idx);
    let base = edge.length_m * edge.c_highway * c_context(edge.class, weather);
    base * overlay.penalty(edge_idx)
}

fn heuristic(graph: &Graph, node: NodeIdx, target: NodeIdx) -> f64 {
    let a = graph.node(node);
    let b = graph.node(target);
    haversine_distance(a.lat, a.lon, b.lat, b.lon) * graph.heuristic_constant
}

/// Run A* from `source` to `target` under `weather` and `overlay`. `budget`
/// is a wall-clock ceiling checked once per expansion; `None` means
/// unbounded.
pub fn search(
    graph: &Graph,
    source: NodeIdx,
    target: NodeIdx,
    weather: Weather,
    overlay: &Overlay,
    budget: Option<Duration>,
) -> Result<PathResult> {
    let started = Instant::now();

    if source == target {
        return Ok(PathResult {
            nodes: vec![source],
            polyline: vec![(graph.node(source).lon, graph.node(source).lat)],
            length_m: 0.0,
            duration_s: 0.0,
            stats: SearchStats {
                nodes_visited: 0,
                wall_time: started.elapsed(),
            },
        });
    }

    let mut open: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    let mut g_score: FxHashMap<NodeIdx, f64> = FxHashMap::default();
    let mut predecessor: FxHashMap<NodeIdx, (NodeIdx, EdgeIdx)> = FxHashMap::default();
    let mut closed: FxHashSet<NodeIdx> = FxHashSet::default();
    let mut sequence: u64 = 0;
    let mut nodes_visited = 0usize;

    g_score.insert(source, 0.0);
    open.push(FrontierEntry {
        f: heuristic(graph, source, target),
        sequence,
        node: source,
    });
    sequence += 1;

    while let Some(entry) = open.pop() {
        if closed.contains(&entry.node) {
            continue;
        }

        if let Some(budget) = budget {
            if started.elapsed() > budget {
                return Err(Error::Timeout { nodes_visited });
            }
        }

        nodes_visited += 1;
        closed.insert(entry.node);

        if entry.node == target {
            let (nodes, edges) = reconstruct(source, target, &predecessor);
            let polyline = stitch_polyline(graph, source, &edges);
            let length_m = edges.iter().map(|&e| graph.edge(e).length_m).sum();
            let duration_s = edges.iter().map(|&e| graph.edge(e).duration_s()).sum();
            return Ok(PathResult {
                nodes,
                polyline,
                length_m,
                duration_s,
                stats: SearchStats {
                    nodes_visited,
                    wall_time: started.elapsed(),
                },
            });
        }

        let current_g = g_score[&entry.node];

        for &edge_idx in graph.outgoing(entry.node) {
            let edge = graph.edge(edge_idx);
            let neighbor = edge.target;
            if overlay.is_blocked(edge_idx) || closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + weight(graph, edge_idx, weather, overlay);
            let improves = g_score.get(&neighbor).map(|&g| tentative_g < g).unwrap_or(true);
            if improves {
                g_score.insert(neighbor, tentative_g);
                predecessor.insert(neighbor, (entry.node, edge_idx));
                open.push(FrontierEntry {
                    f: tentative_g + heuristic(graph, neighbor, target),
                    sequence,
                    node: neighbor,
                });
                sequence += 1;
            }
        }
    }

    Err(Error::NoPath {
        source: graph.node(source).osm_id,
        target: graph.node(target).osm_id,
    })
}

fn reconstruct(
    source: NodeIdx,
    target: NodeIdx,
    predecessor: &FxHashMap<NodeIdx, (NodeIdx, EdgeIdx)>,
) -> (Vec<NodeIdx>, Vec<EdgeIdx>) {
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut cursor = target;

    while cursor != source {
        let &(prev, edge_idx) = &predecessor[&cursor];
        edges.push(edge_idx);
        nodes.push(prev);
        cursor = prev;
    }

    nodes.reverse();
    edges.reverse();
    (nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathergraph_graph::types::{Edge, Node};
    use weathergraph_weights::HighwayClass;

    fn line_graph() -> Graph {
        // A(0,0) -> B(0,1) -> C(0,2), residential, bidirectional.
        let nodes = vec![
            Node { osm_id: 1, lat: 0.0, lon: 0.0 },
            Node { osm_id: 2, lat: 1.0, lon: 0.0 },
            Node { osm_id: 3, lat: 2.0, lon: 0.0 },
        ];
        let mk = |s: usize, t: usize, poly: Vec<(f64, f64)>| Edge {
            source: NodeIdx(s as u32),
            target: NodeIdx(t as u32),
            way_id: 1,
            polyline: poly,
            length_m: haversine_distance(nodes[s].lat, nodes[s].lon, nodes[t].lat, nodes[t].lon),
            class: HighwayClass::Residential,
            name: None,
            speed_kmh: 30.0,
            c_highway: HighwayClass::Residential.c_highway(),
        };
        let edges = vec![
            mk(0, 1, vec![(0.0, 0.0), (0.0, 1.0)]),
            mk(1, 0, vec![(0.0, 1.0), (0.0, 0.0)]),
            mk(1, 2, vec![(0.0, 1.0), (0.0, 2.0)]),
            mk(2, 1, vec![(0.0, 2.0), (0.0, 1.0)]),
        ];
        Graph::from_parts(nodes, edges)
    }

    #[test]
    fn finds_the_two_arc_path_on_the_reference_scenario() {
        let graph = line_graph();
        let overlay = Overlay::default();
        let result = search(&graph, NodeIdx(0), NodeIdx(2), Weather::Normal, &overlay, None).unwrap();
        assert_eq!(
            result.nodes.iter().map(|n| graph.node(*n).osm_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!((result.length_m - 222_000.0).abs() < 2_000.0);
    }

    #[test]
    fn blocking_the_only_edge_returns_no_path() {
        let graph = line_graph();
        let mut overlay = Overlay::default();
        overlay.block(EdgeIdx(0));
        overlay.block(EdgeIdx(1));
        let result = search(&graph, NodeIdx(0), NodeIdx(1), Weather::Normal, &overlay, None);
        assert!(matches!(result, Err(Error::NoPath { .. })));
    }

    #[test]
    fn same_source_and_target_is_a_zero_length_path() {
        let graph = line_graph();
        let overlay = Overlay::default();
        let result = search(&graph, NodeIdx(0), NodeIdx(0), Weather::Normal, &overlay, None).unwrap();
        assert_eq!(result.nodes, vec![NodeIdx(0)]);
        assert_eq!(result.length_m, 0.0);
    }

    #[test]
    fn penalty_multiplier_can_make_a_detour_cheaper() {
        // Add a D node making A->D->C an alternative; penalize A->B so the
        // detour wins even though it is geometrically longer.
        let mut graph = line_graph();
        graph.nodes.push(Node { osm_id: 4, lat: 0.5, lon: 0.5 });
        let d_idx = NodeIdx((graph.nodes.len() - 1) as u32);
        graph.adjacency.push(Vec::new());

        let a_to_d_len = haversine_distance(0.0, 0.0, 0.5, 0.5);
        let d_to_c_len = haversine_distance(0.5, 0.5, 2.0, 0.0);
        let mut edges = graph.edges.clone();
        let a_to_d = EdgeIdx(edges.len() as u32);
        edges.push(Edge {
            source: NodeIdx(0),
            target: d_idx,
            way_id: 2,
            polyline: vec![(0.0, 0.0), (0.5, 0.5)],
            length_m: a_to_d_len,
            class: HighwayClass::Residential,
            name: None,
            speed_kmh: 30.0,
            c_highway: HighwayClass::Residential.c_highway(),
        });
        let d_to_c = EdgeIdx(edges.len() as u32);
        edges.push(Edge {
            source: d_idx,
            target: NodeIdx(2),
            way_id: 2,
            polyline: vec![(0.5, 0.5), (0.0, 2.0)],
            length_m: d_to_c_len,
            class: HighwayClass::Residential,
            name: None,
            speed_kmh: 30.0,
            c_highway: HighwayClass::Residential.c_highway(),
        });
        graph.edges = edges;
        graph.adjacency[0].push(a_to_d);
        graph.adjacency[d_idx.0 as usize].push(d_to_c);

        let mut overlay = Overlay::default();
        overlay.add_penalty(EdgeIdx(0), 50.0);

        let result = search(&graph, NodeIdx(0), NodeIdx(2), Weather::Normal, &overlay, None).unwrap();
        assert!(result.nodes.contains(&d_idx));
    }
}
