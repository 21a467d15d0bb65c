//! Overpass API client: query construction, multi-mirror fallback, and
//! response parsing into [`OsmData`]. Mirrors the Python prototype's
//! `build_overpass_query` / `fetch_from_overpass` / `parse_overpass_response`.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use weathergraph_common::classes::ALLOWED_HIGHWAY_CLASSES;
use weathergraph_common::{Error, Result};

use crate::model::{Bbox, OsmData, OsmNode, OsmWay};

/// Mirrors tried in order until one answers. The first is the canonical
/// public instance; the rest are community mirrors kept as fallback when it
/// is rate-limiting or down.
pub const OVERPASS_ENDPOINTS: &[&str] = &[
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Builds the Overpass QL query for a bbox: all ways whose `highway` tag is
/// one of the routable classes, plus their nodes, plus standalone nodes that
/// feed the geocoder's address index — `addr:housenumber` houses and named
/// POI nodes tagged `amenity`/`shop`/`tourism`/`building` (§4.1).
pub fn build_query(bbox: &Bbox) -> String {
    let highway_regex = ALLOWED_HIGHWAY_CLASSES.join("|");
    let bbox_clause = format!(
        "{:.6},{:.6},{:.6},{:.6}",
        bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
    );

    format!(
        "[out:json][timeout:180];\n\
         (\n\
         \u{20}way[\"highway\"~\"^({highway_regex})$\"]({bbox_clause});\n\
         \u{20}node[\"addr:housenumber\"]({bbox_clause});\n\
         \u{20}node[\"name\"][\"amenity\"]({bbox_clause});\n\
         \u{20}node[\"name\"][\"shop\"]({bbox_clause});\n\
         \u{20}node[\"name\"][\"tourism\"]({bbox_clause});\n\
         \u{20}node[\"name\"][\"building\"]({bbox_clause});\n\
         );\n\
         out body;\n\
         >;\n\
         out skel qt;",
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    nodes: Option<Vec<i64>>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Fetch OSM data for `bbox`, trying each endpoint in [`OVERPASS_ENDPOINTS`]
/// until one succeeds. Returns the last error if all of them fail.
pub async fn fetch(client: &reqwest::Client, bbox: &Bbox) -> Result<OsmData> {
    let query = build_query(bbox);
    let mut last_err = None;

    for endpoint in OVERPASS_ENDPOINTS {
        match fetch_from(client, endpoint, &query).await {
            Ok(data) => return Ok(data),
            Err(e) => {
                warn!(endpoint, error = %e, "overpass endpoint failed, trying next mirror");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| Error::IngestFailure("no overpass endpoints configured".into())))
}

async fn fetch_from(client: &reqwest::Client, endpoint: &str, query: &str) -> Result<OsmData> {
    info!(endpoint, "querying overpass");
    let response = client
        .post(endpoint)
        .timeout(REQUEST_TIMEOUT)
        .body(format!("data={}", query))
        .header(
            "Content-Type",
            "application/x-www-form-urlencoded; charset=UTF-8",
        )
        .send()
        .await
        .map_err(|e| Error::IngestFailure(format!("overpass request to {endpoint} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::IngestFailure(format!(
            "overpass endpoint {endpoint} returned status {}",
            response.status()
        )));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| Error::IngestFailure(format!("overpass response from {endpoint} was not valid JSON: {e}")))?;

    parse_response(body)
}

/// Parse a raw Overpass `[out:json]` body into [`OsmData`]. Node elements
/// become [`OsmNode`]s; way elements become [`OsmWay`]s referencing nodes by
/// ID (the node list itself is deduplicated from the response's element
/// stream, as Overpass's `>;` recurse-down emits every member node once).
pub fn parse_response(body: Value) -> Result<OsmData> {
    let parsed: OverpassResponse = serde_json::from_value(body)
        .map_err(|e| Error::IngestFailure(format!("failed to parse overpass elements: {e}")))?;

    let mut data = OsmData::default();

    for element in parsed.elements {
        match element.kind.as_str() {
            "node" => {
                let (Some(lat), Some(lon)) = (element.lat, element.lon) else {
                    continue;
                };
                data.nodes.insert(
                    element.id,
                    OsmNode {
                        id: element.id,
                        lat,
                        lon,
                        tags: element.tags,
                    },
                );
            }
            "way" => {
                let Some(nodes) = element.nodes else {
                    continue;
                };
                data.ways.push(OsmWay {
                    id: element.id,
                    nodes,
                    tags: element.tags,
                });
            }
            _ => {}
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_includes_all_allowed_classes() {
        let bbox = Bbox::new(21.0, 105.8, 21.1, 105.9);
        let query = build_query(&bbox);
        for class in ALLOWED_HIGHWAY_CLASSES {
            assert!(query.contains(class), "missing {class} in query");
        }
        assert!(query.contains("21.000000,105.800000,21.100000,105.900000"));
    }

    #[test]
    fn parses_nodes_and_ways_from_response() {
        let body = json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 21.0, "lon": 105.8, "tags": {}},
                {"type": "node", "id": 2, "lat": 21.01, "lon": 105.81, "tags": {"addr:housenumber": "12"}},
                {"type": "way", "id": 100, "nodes": [1, 2], "tags": {"highway": "residential"}},
            ]
        });

        let data = parse_response(body).unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.ways.len(), 1);
        assert_eq!(data.ways[0].highway(), Some("residential"));
        assert_eq!(data.nodes[&2].tag("addr:housenumber"), Some("12"));
    }

    #[test]
    fn skips_elements_missing_required_fields() {
        let body = json!({
            "elements": [
                {"type": "node", "id": 1, "tags": {}},
                {"type": "relation", "id": 5, "tags": {}},
            ]
        });

        let data = parse_response(body).unwrap();
        assert!(data.nodes.is_empty());
        assert!(data.ways.is_empty());
    }
}
