mod cli;
mod geojson_input;
mod snapshot;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::{error, info};
use weathergraph_common::Error as CoreError;
use weathergraph_osm::Bbox;
use weathergraph_routing::{Endpoint, Context};
use weathergraph_weights::Weather;

fn install_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();
}

fn parse_bbox(s: &str) -> anyhow::Result<Bbox> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    anyhow::ensure!(parts.len() == 4, "bbox must be \"min_lat,min_lon,max_lat,max_lon\"");
    Ok(Bbox::new(
        parts[0].parse()?,
        parts[1].parse()?,
        parts[2].parse()?,
        parts[3].parse()?,
    ))
}

/// A bare integer is a node ID, "lat,lon" is a coordinate pair, anything
/// else is a free-text address query.
fn parse_endpoint(s: &str) -> Endpoint {
    if let Ok(id) = s.parse::<i64>() {
        return Endpoint::NodeId(id);
    }
    let parts: Vec<&str> = s.splitn(2, ',').map(str::trim).collect();
    if parts.len() == 2 {
        if let (Ok(lat), Ok(lon)) = (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
            return Endpoint::Coords(lat, lon);
        }
    }
    Endpoint::Address(s.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    install_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliFailure::Ingest(e)) => {
            error!(error = %e, "ingest failed");
            ExitCode::from(2)
        }
        Err(CliFailure::Build(e)) => {
            error!(error = %e, "graph build failed");
            ExitCode::from(1)
        }
        Err(CliFailure::Other(e)) => {
            error!(error = %e, "command failed");
            ExitCode::from(1)
        }
    }
}

enum CliFailure {
    Ingest(CoreError),
    Build(CoreError),
    Other(anyhow::Error),
}

impl From<anyhow::Error> for CliFailure {
    fn from(e: anyhow::Error) -> Self {
        CliFailure::Other(e)
    }
}

async fn run(cli: Cli) -> Result<(), CliFailure> {
    match cli.command {
        Commands::Build { bbox, output, cache_dir } => {
            let bbox = parse_bbox(&bbox)?;
            let client = reqwest::Client::new();

            info!(?bbox, "ingesting bounding box");
            let osm = weathergraph_osm::ingest(&client, &cache_dir, &bbox)
                .await
                .map_err(CliFailure::Ingest)?;
            info!(nodes = osm.nodes.len(), ways = osm.ways.len(), "ingest complete");

            info!("building graph, spatial indices, and address index");
            let ctx = Context::build(&osm).map_err(CliFailure::Build)?;
            info!(
                nodes = ctx.graph.node_count(),
                edges = ctx.graph.edge_count(),
                addresses = ctx.addresses.len(),
                "graph build complete"
            );

            snapshot::save(&output, &ctx)?;
            info!(path = %output.display(), "snapshot saved");
            Ok(())
        }
        Commands::Route { snapshot, from, to, weather, blocking_geometries, flood_areas } => {
            let ctx = snapshot::load(&snapshot)?;
            let weather: Weather = weather.parse().map_err(|e| CliFailure::Other(anyhow::anyhow!("{e}")))?;
            let blocking = geojson_input::load_all(&blocking_geometries)?;
            let flood = geojson_input::load_all(&flood_areas)?;

            let result = weathergraph_routing::route(
                &ctx,
                parse_endpoint(&from),
                parse_endpoint(&to),
                weather,
                &blocking,
                &flood,
                Some(std::time::Duration::from_secs(10)),
            )
            .map_err(|e| anyhow::anyhow!(e))?;

            println!("distance: {:.0} m", result.distance_m);
            println!("duration: {:.1} min", result.duration_s / 60.0);
            println!("nodes visited: {}", result.nodes_visited);
            println!("path: {:?}", result.path);
            println!("{}", serde_json::to_string_pretty(&result.route).unwrap());
            Ok(())
        }
        Commands::Serve { snapshot, port } => {
            let ctx = snapshot::load(&snapshot)?;
            info!(nodes = ctx.graph.node_count(), edges = ctx.graph.edge_count(), "snapshot loaded");
            weathergraph_serve::run_server(std::sync::Arc::new(ctx), port).await?;
            Ok(())
        }
    }
}
