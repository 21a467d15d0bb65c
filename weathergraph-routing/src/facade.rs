//! §4.7: the single entry point tying endpoint resolution, the obstruction
//! overlay, and A* together.

use std::time::{Duration, Instant};

use geojson::{Feature, Geometry, Value};
use weathergraph_common::{Error, Result};
use weathergraph_weights::Weather;

use crate::context::Context;
use crate::endpoint::{resolve, Endpoint, ResolvedEndpoint};

#[derive(Debug, Clone, Default)]
pub struct TimingStats {
    pub resolve_s: f64,
    pub search_s: f64,
    pub total_s: f64,
}

pub struct RouteResult {
    pub distance_m: f64,
    pub duration_s: f64,
    pub route: Feature,
    pub path: Vec<i64>,
    pub resolved_origin: ResolvedEndpoint,
    pub resolved_destination: ResolvedEndpoint,
    pub nodes_visited: usize,
    pub stats: TimingStats,
}

/// Resolve origin/destination, build the obstruction overlay from the
/// combined blocking + flood feature lists, run A*, and assemble the
/// response. `budget` caps the search's wall-clock time; `None` is
/// unbounded.
pub fn route(
    ctx: &Context,
    origin: Endpoint,
    destination: Endpoint,
    weather: Weather,
    blocking_geometries: &[Feature],
    flood_areas: &[Feature],
    budget: Option<Duration>,
) -> Result<RouteResult> {
    let started = Instant::now();

    let resolve_started = Instant::now();
    let resolved_origin = resolve(ctx, &origin)?;
    let resolved_destination = resolve(ctx, &destination)?;
    let resolve_s = resolve_started.elapsed().as_secs_f64();

    if resolved_origin.node == resolved_destination.node {
        return Err(Error::SameEndpoint(resolved_origin.osm_id));
    }

    let mut features = Vec::with_capacity(blocking_geometries.len() + flood_areas.len());
    features.extend_from_slice(blocking_geometries);
    features.extend_from_slice(flood_areas);
    let overlay = weathergraph_obstruction::resolve(&ctx.graph, &ctx.spatial.edges, &features);

    let search_started = Instant::now();
    let result = weathergraph_search::search(
        &ctx.graph,
        resolved_origin.node,
        resolved_destination.node,
        weather,
        &overlay,
        budget,
    )?;
    let search_s = search_started.elapsed().as_secs_f64();

    let path: Vec<i64> = result.nodes.iter().map(|&n| ctx.graph.node(n).osm_id).collect();
    let line: Vec<Vec<f64>> = result.polyline.iter().map(|&(lon, lat)| vec![lon, lat]).collect();
    let route_feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(line))),
        id: None,
        properties: None,
        foreign_members: None,
    };

    Ok(RouteResult {
        distance_m: result.length_m,
        duration_s: result.duration_s,
        route: route_feature,
        path,
        resolved_origin,
        resolved_destination,
        nodes_visited: result.stats.nodes_visited,
        stats: TimingStats {
            resolve_s,
            search_s,
            total_s: started.elapsed().as_secs_f64(),
        },
    })
}
