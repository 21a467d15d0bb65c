//! Step 1 (way filter) and step 2 (raw graph) of the builder pipeline.

use rustc_hash::{FxHashMap, FxHashSet};
use weathergraph_common::geo::haversine_distance;
use weathergraph_osm::{OsmData, OsmWay};
use weathergraph_weights::HighwayClass;

/// A single directed edge between two adjacent way nodes, before LSCC
/// filtering or compression. One way contributes one `RawEdge` per
/// traversed pair of adjacent nodes, per direction allowed by its `oneway`
/// tag.
#[derive(Debug, Clone)]
pub struct RawEdge {
    pub from: i64,
    pub to: i64,
    pub way_id: i64,
    pub class: HighwayClass,
    pub name: Option<String>,
    pub from_coord: (f64, f64),
    pub to_coord: (f64, f64),
    pub length_m: f64,
}

#[derive(Debug, Default)]
pub struct RawGraph {
    /// Every node referenced by a retained way, keyed by OSM ID.
    pub node_coords: FxHashMap<i64, (f64, f64)>,
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnewayPolicy {
    Both,
    Forward,
    Reverse,
}

fn oneway_policy(way: &OsmWay) -> OnewayPolicy {
    match way.tag("oneway") {
        Some("yes") | Some("1") | Some("true") => OnewayPolicy::Forward,
        Some("-1") => OnewayPolicy::Reverse,
        _ => OnewayPolicy::Both,
    }
}

/// Filter ways by allowed highway class and build the raw directed graph:
/// every adjacent node pair along a retained way becomes one or two
/// directed edges depending on the way's `oneway` tag.
pub fn build_raw_graph(osm: &OsmData) -> RawGraph {
    let mut raw = RawGraph::default();
    let mut missing_nodes: FxHashSet<i64> = FxHashSet::default();

    for way in &osm.ways {
        let Some(highway) = way.highway() else {
            continue;
        };
        let Some(class) = HighwayClass::from_osm_tag(highway) else {
            continue;
        };
        if way.nodes.len() < 2 {
            continue;
        }

        let policy = oneway_policy(way);
        let name = way.tag("name").map(str::to_owned);

        for pair in way.nodes.windows(2) {
            let [a, b] = [pair[0], pair[1]];
            let (Some(a_node), Some(b_node)) = (osm.nodes.get(&a), osm.nodes.get(&b)) else {
                missing_nodes.insert(a);
                missing_nodes.insert(b);
                continue;
            };

            let a_coord = (a_node.lon, a_node.lat);
            let b_coord = (b_node.lon, b_node.lat);
            let length_m = haversine_distance(a_node.lat, a_node.lon, b_node.lat, b_node.lon);

            raw.node_coords.insert(a, a_coord);
            raw.node_coords.insert(b, b_coord);

            if policy != OnewayPolicy::Reverse {
                raw.edges.push(RawEdge {
                    from: a,
                    to: b,
                    way_id: way.id,
                    class,
                    name: name.clone(),
                    from_coord: a_coord,
                    to_coord: b_coord,
                    length_m,
                });
            }
            if policy != OnewayPolicy::Forward {
                raw.edges.push(RawEdge {
                    from: b,
                    to: a,
                    way_id: way.id,
                    class,
                    name: name.clone(),
                    from_coord: b_coord,
                    to_coord: a_coord,
                    length_m,
                });
            }
        }
    }

    if !missing_nodes.is_empty() {
        tracing::warn!(
            count = missing_nodes.len(),
            "way referenced node IDs absent from the parsed OSM data, segment dropped"
        );
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use weathergraph_osm::{OsmData, OsmNode, OsmWay};

    fn node(id: i64, lat: f64, lon: f64) -> OsmNode {
        OsmNode {
            id,
            lat,
            lon,
            tags: HashMap::new(),
        }
    }

    fn way(id: i64, nodes: Vec<i64>, tags: &[(&str, &str)]) -> OsmWay {
        OsmWay {
            id,
            nodes,
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn bidirectional_way_yields_edges_both_directions() {
        let mut osm = OsmData::default();
        osm.nodes.insert(1, node(1, 0.0, 0.0));
        osm.nodes.insert(2, node(2, 0.0, 1.0));
        osm.ways.push(way(100, vec![1, 2], &[("highway", "residential")]));

        let raw = build_raw_graph(&osm);
        assert_eq!(raw.edges.len(), 2);
        assert!(raw.edges.iter().any(|e| e.from == 1 && e.to == 2));
        assert!(raw.edges.iter().any(|e| e.from == 2 && e.to == 1));
    }

    #[test]
    fn oneway_forward_yields_single_direction() {
        let mut osm = OsmData::default();
        osm.nodes.insert(1, node(1, 0.0, 0.0));
        osm.nodes.insert(2, node(2, 0.0, 1.0));
        osm.ways.push(way(
            100,
            vec![1, 2],
            &[("highway", "residential"), ("oneway", "yes")],
        ));

        let raw = build_raw_graph(&osm);
        assert_eq!(raw.edges.len(), 1);
        assert_eq!(raw.edges[0].from, 1);
        assert_eq!(raw.edges[0].to, 2);
    }

    #[test]
    fn oneway_reverse_flips_direction() {
        let mut osm = OsmData::default();
        osm.nodes.insert(1, node(1, 0.0, 0.0));
        osm.nodes.insert(2, node(2, 0.0, 1.0));
        osm.ways.push(way(
            100,
            vec![1, 2],
            &[("highway", "residential"), ("oneway", "-1")],
        ));

        let raw = build_raw_graph(&osm);
        assert_eq!(raw.edges.len(), 1);
        assert_eq!(raw.edges[0].from, 2);
        assert_eq!(raw.edges[0].to, 1);
    }

    #[test]
    fn non_routable_highway_class_is_dropped() {
        let mut osm = OsmData::default();
        osm.nodes.insert(1, node(1, 0.0, 0.0));
        osm.nodes.insert(2, node(2, 0.0, 1.0));
        osm.ways.push(way(100, vec![1, 2], &[("highway", "footway")]));

        let raw = build_raw_graph(&osm);
        assert!(raw.edges.is_empty());
    }
}
