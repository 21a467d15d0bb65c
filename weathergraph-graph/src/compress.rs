//! Step 4: degree-2 chain compression.
//!
//! A node is chain-interior when it touches exactly two distinct neighbors
//! (counting both successors and predecessors) and every incident edge
//! shares one highway class. Every other node is retained as-is. Compressed
//! edges concatenate the polylines of the segments they replace, dropping
//! duplicate join points, and inherit class/name/speed/`c_highway` from the
//! first segment of the chain.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::raw::RawEdge;
use weathergraph_weights::HighwayClass;

pub struct CompressedEdge {
    pub from: i64,
    pub to: i64,
    pub way_id: i64,
    pub class: HighwayClass,
    pub name: Option<String>,
    pub polyline: Vec<(f64, f64)>,
    pub length_m: f64,
}

const COORD_TOLERANCE_DEG: f64 = 1e-6;

fn coords_match(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < COORD_TOLERANCE_DEG && (a.1 - b.1).abs() < COORD_TOLERANCE_DEG
}

/// Determine which retained-component nodes are chain-interior.
fn interior_nodes(retained: &FxHashSet<i64>, edges: &[RawEdge]) -> FxHashSet<i64> {
    let mut neighbors: FxHashMap<i64, FxHashSet<i64>> = FxHashMap::default();
    let mut classes: FxHashMap<i64, FxHashSet<HighwayClass>> = FxHashMap::default();

    for edge in edges {
        if !retained.contains(&edge.from) || !retained.contains(&edge.to) {
            continue;
        }
        neighbors.entry(edge.from).or_default().insert(edge.to);
        neighbors.entry(edge.to).or_default().insert(edge.from);
        classes.entry(edge.from).or_default().insert(edge.class);
        classes.entry(edge.to).or_default().insert(edge.class);
    }

    let mut interior = FxHashSet::default();
    for &node in retained {
        let Some(n) = neighbors.get(&node) else {
            continue;
        };
        let Some(c) = classes.get(&node) else {
            continue;
        };
        if n.len() == 2 && c.len() == 1 {
            interior.insert(node);
        }
    }
    interior
}

/// Walk from `start` (a non-interior node) through `via` (an interior
/// neighbor) until the chain reaches another non-interior node, a dead end,
/// or loops back to `start` (discarded).
fn walk_chain(
    start: i64,
    first_edge: &RawEdge,
    interior: &FxHashSet<i64>,
    by_source: &FxHashMap<i64, Vec<usize>>,
    edges: &[RawEdge],
) -> Option<CompressedEdge> {
    let mut polyline = vec![first_edge.from_coord, first_edge.to_coord];
    let mut length_m = first_edge.length_m;
    let mut prev = start;
    let mut current = first_edge.to;

    while interior.contains(&current) {
        let candidates = by_source.get(&current)?;
        let next_edge = candidates
            .iter()
            .map(|&i| &edges[i])
            .find(|e| e.to != prev)?;

        if next_edge.to == start {
            return None;
        }

        if !coords_match(*polyline.last().unwrap(), next_edge.from_coord) {
            polyline.push(next_edge.from_coord);
        }
        polyline.push(next_edge.to_coord);
        length_m += next_edge.length_m;

        prev = current;
        current = next_edge.to;
    }

    Some(CompressedEdge {
        from: start,
        to: current,
        way_id: first_edge.way_id,
        class: first_edge.class,
        name: first_edge.name.clone(),
        polyline,
        length_m,
    })
}

/// An all-interior component (e.g. a uniform-class roundabout with no
/// branching) has no node that is naturally non-interior. A single promoted
/// anchor isn't enough: the only chain leaving it loops all the way around
/// and back to itself, which `walk_chain` discards as a self-loop, leaving
/// the anchor with no edges at all. Promote two nodes roughly opposite each
/// other on the cycle instead, splitting it into two ordinary chains.
fn promote_roundabout_anchors(
    retained: &FxHashSet<i64>,
    by_source: &FxHashMap<i64, Vec<usize>>,
    edges: &[RawEdge],
    interior: &mut FxHashSet<i64>,
) {
    let Some(&start) = retained.iter().min() else {
        return;
    };
    interior.remove(&start);

    let Some(&first) = by_source.get(&start).and_then(|v| v.first()) else {
        return;
    };

    let mut order = vec![start];
    let mut prev = start;
    let mut current = edges[first].to;
    while current != start {
        order.push(current);
        let Some(candidates) = by_source.get(&current) else {
            break;
        };
        let Some(next) = candidates.iter().map(|&i| &edges[i]).find(|e| e.to != prev) else {
            break;
        };
        prev = current;
        current = next.to;
    }

    if order.len() > 1 {
        interior.remove(&order[order.len() / 2]);
    }
}

/// Compress the LSCC-filtered raw graph. Returns the compressed edge list
/// and the final set of retained node IDs (which may include nodes promoted
/// out of an all-interior cycle, e.g. a uniform-class roundabout with no
/// branching, so the component is not silently dropped).
pub fn compress(retained: &FxHashSet<i64>, edges: &[RawEdge]) -> (FxHashSet<i64>, Vec<CompressedEdge>) {
    let mut interior = interior_nodes(retained, edges);

    let mut by_source: FxHashMap<i64, Vec<usize>> = FxHashMap::default();
    for (i, edge) in edges.iter().enumerate() {
        if retained.contains(&edge.from) && retained.contains(&edge.to) {
            by_source.entry(edge.from).or_default().push(i);
        }
    }

    if !retained.is_empty() && interior.len() == retained.len() {
        promote_roundabout_anchors(retained, &by_source, edges, &mut interior);
    }

    let final_nodes: FxHashSet<i64> = retained.difference(&interior).copied().collect();

    let mut compressed = Vec::new();
    for &node in &final_nodes {
        let Some(out_edges) = by_source.get(&node) else {
            continue;
        };
        for &i in out_edges {
            let edge = &edges[i];
            if interior.contains(&edge.to) {
                if let Some(c) = walk_chain(node, edge, &interior, &by_source, edges) {
                    compressed.push(c);
                }
            } else {
                compressed.push(CompressedEdge {
                    from: edge.from,
                    to: edge.to,
                    way_id: edge.way_id,
                    class: edge.class,
                    name: edge.name.clone(),
                    polyline: vec![edge.from_coord, edge.to_coord],
                    length_m: edge.length_m,
                });
            }
        }
    }

    (final_nodes, compressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: i64, to: i64, class: HighwayClass) -> RawEdge {
        RawEdge {
            from,
            to,
            way_id: 1,
            class,
            name: None,
            from_coord: (from as f64, 0.0),
            to_coord: (to as f64, 0.0),
            length_m: 1.0,
        }
    }

    #[test]
    fn chain_of_interior_nodes_collapses_to_one_edge() {
        // 1 -> 2 -> 3 -> 4, bidirectional, all residential; 2 and 3 are interior.
        let mut edges = vec![];
        for (a, b) in [(1, 2), (2, 3), (3, 4)] {
            edges.push(edge(a, b, HighwayClass::Residential));
            edges.push(edge(b, a, HighwayClass::Residential));
        }
        let retained: FxHashSet<i64> = [1, 2, 3, 4].into_iter().collect();

        let (final_nodes, compressed) = compress(&retained, &edges);
        assert_eq!(final_nodes, [1, 4].into_iter().collect());
        assert_eq!(compressed.len(), 2); // 1->4 and 4->1
        let forward = compressed.iter().find(|c| c.from == 1).unwrap();
        assert_eq!(forward.to, 4);
        assert_eq!(forward.polyline.first(), Some(&(1.0, 0.0)));
        assert_eq!(forward.polyline.last(), Some(&(4.0, 0.0)));
        assert!((forward.length_m - 3.0).abs() < 1e-9);
    }

    #[test]
    fn all_interior_roundabout_keeps_its_edges() {
        // 1 -> 2 -> 3 -> 4 -> 1, bidirectional, all residential: every node
        // has exactly two neighbors and one class, so none is naturally
        // non-interior. The cycle must survive as two anchored chains
        // rather than collapse to an isolated node.
        let mut edges = vec![];
        for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 1)] {
            edges.push(edge(a, b, HighwayClass::Residential));
            edges.push(edge(b, a, HighwayClass::Residential));
        }
        let retained: FxHashSet<i64> = [1, 2, 3, 4].into_iter().collect();

        let (final_nodes, compressed) = compress(&retained, &edges);
        assert!(final_nodes.len() >= 2, "roundabout must keep at least two anchors");
        assert!(!compressed.is_empty(), "roundabout must not lose all its edges");
        for c in &compressed {
            assert_ne!(c.from, c.to, "compression must not produce self-loops");
        }
        // every anchor must still be reachable from every other anchor
        let mut out: FxHashMap<i64, Vec<i64>> = FxHashMap::default();
        for c in &compressed {
            out.entry(c.from).or_default().push(c.to);
        }
        for &a in &final_nodes {
            for &b in &final_nodes {
                if a == b {
                    continue;
                }
                assert!(reachable(a, b, &out), "{a} should reach {b}");
            }
        }
    }

    fn reachable(from: i64, to: i64, out: &FxHashMap<i64, Vec<i64>>) -> bool {
        let mut seen: FxHashSet<i64> = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(n) = stack.pop() {
            if n == to {
                return true;
            }
            if !seen.insert(n) {
                continue;
            }
            if let Some(next) = out.get(&n) {
                stack.extend(next.iter().copied());
            }
        }
        false
    }

    #[test]
    fn branching_node_is_not_interior() {
        // 2 has three neighbors (1, 3, 5): not interior despite same class.
        let mut edges = vec![];
        for (a, b) in [(1, 2), (2, 3), (2, 5)] {
            edges.push(edge(a, b, HighwayClass::Residential));
            edges.push(edge(b, a, HighwayClass::Residential));
        }
        let retained: FxHashSet<i64> = [1, 2, 3, 5].into_iter().collect();

        let (final_nodes, _compressed) = compress(&retained, &edges);
        assert!(final_nodes.contains(&2));
    }

    #[test]
    fn differing_class_at_node_prevents_compression() {
        let mut edges = vec![
            edge(1, 2, HighwayClass::Residential),
            edge(2, 1, HighwayClass::Residential),
            edge(2, 3, HighwayClass::Tertiary),
            edge(3, 2, HighwayClass::Tertiary),
        ];
        edges.sort_by_key(|e| (e.from, e.to));
        let retained: FxHashSet<i64> = [1, 2, 3].into_iter().collect();

        let (final_nodes, _compressed) = compress(&retained, &edges);
        assert!(final_nodes.contains(&2));
    }
}
