//! HTTP surface: `/route`, `/suggest`, `/healthz`, and a Swagger UI mounted
//! at `/docs`.

pub mod handlers;
pub mod schemas;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use weathergraph_routing::Context;

use handlers::{healthz_handler, route_handler, suggest_handler};
use schemas::{
    AddressSuggestQuery, AddressSuggestion, ErrorResponse, HealthResponse, ResolvedEndpointDto, ResolvedPairDto,
    RouteRequest, RouteResponse, StatsDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::route_handler, handlers::suggest_handler, handlers::healthz_handler),
    components(schemas(
        RouteRequest,
        RouteResponse,
        ResolvedPairDto,
        ResolvedEndpointDto,
        StatsDto,
        ErrorResponse,
        AddressSuggestQuery,
        AddressSuggestion,
        HealthResponse,
    ))
)]
struct ApiDoc;

/// Build the router over a shared, already-constructed `Context`. Split
/// from `run_server` so tests can exercise the router without binding a
/// socket.
pub fn app(ctx: Arc<Context>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/route", post(route_handler))
        .route("/suggest", get(suggest_handler))
        .route("/healthz", get(healthz_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

pub async fn run_server(ctx: Arc<Context>, port: u16) -> anyhow::Result<()> {
    let app = app(ctx);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(%addr, "server starting");
    tracing::info!(%addr, "API docs available at /docs");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
