//! Request/response shapes for the HTTP surface (§6), including their
//! OpenAPI schema annotations.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

/// `origin`/`destination` accept an integer node ID, a `[lat, lon]` pair,
/// or a free-text address — resolved by the routing facade.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum EndpointDto {
    NodeId(i64),
    Coords([f64; 2]),
    Address(String),
}

impl From<EndpointDto> for weathergraph_routing::Endpoint {
    fn from(dto: EndpointDto) -> Self {
        match dto {
            EndpointDto::NodeId(id) => weathergraph_routing::Endpoint::NodeId(id),
            EndpointDto::Coords([lat, lon]) => weathergraph_routing::Endpoint::Coords(lat, lon),
            EndpointDto::Address(text) => weathergraph_routing::Endpoint::Address(text),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteRequest {
    #[schema(example = json!(123456))]
    pub origin: EndpointDto,
    #[schema(example = json!("88 Pho X"))]
    pub destination: EndpointDto,
    #[serde(default = "default_weather")]
    #[schema(example = "normal")]
    pub weather: String,
    #[serde(default)]
    pub blocking_geometries: Vec<geojson::Feature>,
    #[serde(default)]
    pub flood_areas: Vec<geojson::Feature>,
}

fn default_weather() -> String {
    "normal".to_string()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedEndpointDto {
    pub node_id: i64,
    pub snapped: bool,
    pub matched_address: Option<String>,
    pub score: Option<f64>,
}

impl From<&weathergraph_routing::ResolvedEndpoint> for ResolvedEndpointDto {
    fn from(r: &weathergraph_routing::ResolvedEndpoint) -> Self {
        Self {
            node_id: r.osm_id,
            snapped: r.snapped,
            matched_address: r.matched_address.clone(),
            score: r.score,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedPairDto {
    pub origin: ResolvedEndpointDto,
    pub destination: ResolvedEndpointDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsDto {
    pub resolve_s: f64,
    pub search_s: f64,
    pub total_s: f64,
    pub nodes_visited: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteResponse {
    #[schema(example = 28964.0)]
    pub distance: f64,
    #[schema(example = 1932.0)]
    pub duration: f64,
    /// GeoJSON LineString Feature of the merged route geometry.
    #[schema(value_type = Object)]
    pub route: geojson::Feature,
    pub path: Vec<i64>,
    pub resolved: ResolvedPairDto,
    pub stats: StatsDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct AddressSuggestQuery {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressSuggestion {
    pub node_id: i64,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub score: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub nodes: usize,
    pub edges: usize,
}
