//! Axum handlers. Each wraps a blocking call to the synchronous core in
//! `spawn_blocking`, since A* and the address index are CPU-bound and must
//! not tie up the async runtime's worker threads.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use weathergraph_routing::{route as run_route, Context};
use weathergraph_weights::Weather;

use crate::schemas::{
    AddressSuggestQuery, AddressSuggestion, ErrorResponse, HealthResponse, ResolvedEndpointDto, ResolvedPairDto,
    RouteRequest, RouteResponse, StatsDto,
};

pub type SharedContext = Arc<Context>;

/// Per-request A* time budget; the server enforces this so a pathological
/// query cannot hang a worker thread indefinitely.
const QUERY_BUDGET: Duration = Duration::from_secs(10);

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, err: impl std::fmt::Display) -> ApiError {
    (status, Json(ErrorResponse { error: err.to_string() }))
}

fn status_for(err: &weathergraph_common::Error) -> StatusCode {
    use weathergraph_common::Error;
    match err {
        Error::UnknownEndpoint(_) | Error::SameEndpoint(_) | Error::GeocodeMiss(_) | Error::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::SnapFailure { .. } | Error::NoPath { .. } => StatusCode::NOT_FOUND,
        Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        Error::IngestFailure(_) | Error::EmptyGraph => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[utoipa::path(
    post,
    path = "/route",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Route found", body = RouteResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "No path or no match for an endpoint", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse),
    ),
    tag = "routing"
)]
pub async fn route_handler(
    State(ctx): State<SharedContext>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let weather = Weather::from_str(&req.weather).map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    let result = tokio::task::spawn_blocking(move || {
        run_route(
            &ctx,
            req.origin.into(),
            req.destination.into(),
            weather,
            &req.blocking_geometries,
            &req.flood_areas,
            Some(QUERY_BUDGET),
        )
    })
    .await
    .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e))?
    .map_err(|e| {
        let status = status_for(&e);
        error_response(status, e)
    })?;

    Ok(Json(RouteResponse {
        distance: result.distance_m,
        duration: result.duration_s,
        route: result.route,
        path: result.path,
        resolved: ResolvedPairDto {
            origin: ResolvedEndpointDto::from(&result.resolved_origin),
            destination: ResolvedEndpointDto::from(&result.resolved_destination),
        },
        stats: StatsDto {
            resolve_s: result.stats.resolve_s,
            search_s: result.stats.search_s,
            total_s: result.stats.total_s,
            nodes_visited: result.nodes_visited,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/suggest",
    params(AddressSuggestQuery),
    responses(
        (status = 200, description = "Address suggestions", body = [AddressSuggestion]),
        (status = 400, description = "Query too short", body = ErrorResponse),
    ),
    tag = "geocoding"
)]
pub async fn suggest_handler(
    State(ctx): State<SharedContext>,
    Query(query): Query<AddressSuggestQuery>,
) -> Result<Json<Vec<AddressSuggestion>>, ApiError> {
    if query.q.trim().chars().count() < 2 {
        return Err(error_response(StatusCode::BAD_REQUEST, "q must be at least 2 characters"));
    }
    let limit = query.limit.clamp(1, 20);

    let suggestions = tokio::task::spawn_blocking(move || {
        ctx.addresses
            .search(&query.q, limit)
            .into_iter()
            .map(|m| {
                let entry = ctx.addresses.entry(m.entry_index);
                AddressSuggestion {
                    node_id: ctx.graph.node(entry.node).osm_id,
                    address: entry.address_text.clone(),
                    lat: entry.lat,
                    lon: entry.lon,
                    score: m.score,
                }
            })
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    Ok(Json(suggestions))
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Server is up and the graph is loaded", body = HealthResponse)),
    tag = "ops"
)]
pub async fn healthz_handler(State(ctx): State<SharedContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        nodes: ctx.graph.node_count(),
        edges: ctx.graph.edge_count(),
    })
}
