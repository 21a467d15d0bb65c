//! Step 3: Largest Strongly Connected Component via Kosaraju's algorithm.
//!
//! Forward DFS over the raw graph produces a finish order; a DFS over the
//! transposed graph, visited in reverse finish order, peels off components.
//! Both DFS passes are iterative to avoid blowing the stack on long chains
//! (a bbox extract can have node runs in the thousands).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::raw::RawGraph;

/// Result of LSCC extraction: the OSM IDs retained, and how many smaller
/// components were discarded (for the build-time log line).
pub struct LsccResult {
    pub retained: FxHashSet<i64>,
    pub discarded_components: usize,
    pub discarded_nodes: usize,
}

pub fn largest_scc(raw: &RawGraph) -> LsccResult {
    let mut forward: FxHashMap<i64, Vec<i64>> = FxHashMap::default();
    let mut reverse: FxHashMap<i64, Vec<i64>> = FxHashMap::default();

    for edge in &raw.edges {
        forward.entry(edge.from).or_default().push(edge.to);
        reverse.entry(edge.to).or_default().push(edge.from);
    }

    let all_nodes: Vec<i64> = raw.node_coords.keys().copied().collect();

    let finish_order = forward_finish_order(&all_nodes, &forward);

    let mut visited: FxHashSet<i64> = FxHashSet::default();
    let mut components: Vec<Vec<i64>> = Vec::new();

    for &start in finish_order.iter().rev() {
        if visited.contains(&start) {
            continue;
        }
        let component = collect_component(start, &reverse, &mut visited);
        components.push(component);
    }

    let largest_idx = components
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| c.len())
        .map(|(i, _)| i);

    let Some(largest_idx) = largest_idx else {
        return LsccResult {
            retained: FxHashSet::default(),
            discarded_components: 0,
            discarded_nodes: 0,
        };
    };

    let discarded_nodes = components
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != largest_idx)
        .map(|(_, c)| c.len())
        .sum();

    LsccResult {
        retained: components[largest_idx].iter().copied().collect(),
        discarded_components: components.len() - 1,
        discarded_nodes,
    }
}

fn forward_finish_order(all_nodes: &[i64], forward: &FxHashMap<i64, Vec<i64>>) -> Vec<i64> {
    let mut visited: FxHashSet<i64> = FxHashSet::default();
    let mut order = Vec::with_capacity(all_nodes.len());

    for &start in all_nodes {
        if visited.contains(&start) {
            continue;
        }

        // Explicit stack of (node, next-neighbor-index) so we can resume a
        // partially-expanded frame instead of recursing.
        let mut stack: Vec<(i64, usize)> = vec![(start, 0)];
        visited.insert(start);

        while let Some(&mut (node, ref mut next)) = stack.last_mut() {
            let neighbors = forward.get(&node).map(Vec::as_slice).unwrap_or(&[]);
            if *next < neighbors.len() {
                let child = neighbors[*next];
                *next += 1;
                if visited.insert(child) {
                    stack.push((child, 0));
                }
            } else {
                order.push(node);
                stack.pop();
            }
        }
    }

    order
}

fn collect_component(start: i64, reverse: &FxHashMap<i64, Vec<i64>>, visited: &mut FxHashSet<i64>) -> Vec<i64> {
    let mut component = vec![start];
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        let neighbors = reverse.get(&node).map(Vec::as_slice).unwrap_or(&[]);
        for &neighbor in neighbors {
            if visited.insert(neighbor) {
                component.push(neighbor);
                stack.push(neighbor);
            }
        }
    }

    component
}
