//! §4.6 extraction: three entry kinds pulled from parsed OSM, each attached
//! to the nearest LSCC node (dropped if that node is over 100 m away).

use rustc_hash::FxHashSet;
use weathergraph_common::geo::haversine_distance;
use weathergraph_graph::Graph;
use weathergraph_osm::OsmData;
use weathergraph_spatial::NodeIndex;

use crate::model::{AddressEntry, AddressKind};

const ATTACH_CUTOFF_M: f64 = 100.0;

const POI_TAGS: [&str; 4] = ["amenity", "shop", "tourism", "building"];

fn snap_within_cutoff(graph: &Graph, node_index: &NodeIndex, lat: f64, lon: f64) -> Option<(weathergraph_graph::NodeIdx, f64, f64)> {
    let idx = node_index.nearest(lat, lon)?;
    let node = graph.node(idx);
    let dist = haversine_distance(lat, lon, node.lat, node.lon);
    if dist > ATTACH_CUTOFF_M {
        return None;
    }
    Some((idx, node.lat, node.lon))
}

/// Extract street, house and POI entries. `node_index` must already be
/// built over `graph` (the LSCC-filtered, compressed graph).
pub fn extract(osm: &OsmData, graph: &Graph, node_index: &NodeIndex) -> Vec<AddressEntry> {
    let mut entries = Vec::new();
    let mut house_node_ids: FxHashSet<i64> = FxHashSet::default();

    // Named way centroids, used to backfill a house's street name when it
    // carries no `addr:street` tag of its own.
    let named_ways: Vec<(f64, f64, &str)> = osm
        .ways
        .iter()
        .filter_map(|way| {
            let name = way.tag("name")?;
            let coords: Vec<(f64, f64)> = way
                .nodes
                .iter()
                .filter_map(|id| osm.nodes.get(id))
                .map(|n| (n.lat, n.lon))
                .collect();
            if coords.is_empty() {
                return None;
            }
            let lat = coords.iter().map(|c| c.0).sum::<f64>() / coords.len() as f64;
            let lon = coords.iter().map(|c| c.1).sum::<f64>() / coords.len() as f64;
            Some((lat, lon, name))
        })
        .collect();

    // --- Street entries -----------------------------------------------
    for way in &osm.ways {
        let Some(name) = way.tag("name") else { continue };
        let first_in_lscc = way.nodes.iter().find_map(|id| graph.index_of(*id).map(|idx| (*id, idx)));
        let Some((_, idx)) = first_in_lscc else { continue };
        let node = graph.node(idx);
        entries.push(AddressEntry {
            node: idx,
            lat: node.lat,
            lon: node.lon,
            address_text: name.to_string(),
            house_number: None,
            street_name: Some(name.to_string()),
            kind: AddressKind::Street,
        });
    }

    // --- House entries ---------------------------------------------------
    for node in osm.nodes.values() {
        let Some(house_number_str) = node.tag("addr:housenumber") else { continue };
        let Ok(house_number) = house_number_str.parse::<i64>() else { continue };

        let street_name = node
            .tag("addr:street")
            .map(str::to_owned)
            .or_else(|| nearest_way_name(node.lat, node.lon, &named_ways).map(str::to_owned));

        let Some((idx, snap_lat, snap_lon)) = snap_within_cutoff(graph, node_index, node.lat, node.lon) else {
            continue;
        };

        house_node_ids.insert(node.id);
        let address_text = match &street_name {
            Some(street) => format!("{house_number} {street}"),
            None => house_number_str.to_string(),
        };
        entries.push(AddressEntry {
            node: idx,
            lat: snap_lat,
            lon: snap_lon,
            address_text,
            house_number: Some(house_number),
            street_name,
            kind: AddressKind::House,
        });
    }

    // --- POI entries -----------------------------------------------------
    for node in osm.nodes.values() {
        if house_node_ids.contains(&node.id) {
            continue;
        }
        let Some(name) = node.tag("name") else { continue };
        let is_poi = POI_TAGS.iter().any(|tag| node.tag(tag).is_some());
        if !is_poi {
            continue;
        }
        let Some((idx, snap_lat, snap_lon)) = snap_within_cutoff(graph, node_index, node.lat, node.lon) else {
            continue;
        };
        entries.push(AddressEntry {
            node: idx,
            lat: snap_lat,
            lon: snap_lon,
            address_text: name.to_string(),
            house_number: None,
            street_name: None,
            kind: AddressKind::Poi,
        });
    }

    entries
}

fn nearest_way_name<'a>(lat: f64, lon: f64, named_ways: &'a [(f64, f64, &'a str)]) -> Option<&'a str> {
    named_ways
        .iter()
        .map(|&(way_lat, way_lon, name)| (haversine_distance(lat, lon, way_lat, way_lon), name))
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap())
        .map(|(_, name)| name)
}
