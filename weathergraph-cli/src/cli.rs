//! Argument definitions. Kept separate from `main.rs` so the parsing layer
//! stays easy to scan independently of command dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "weathergraph")]
#[command(about = "Weather-aware urban routing engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a bounding box from Overpass, build the graph and address
    /// index, and save a snapshot.
    Build {
        /// "min_lat,min_lon,max_lat,max_lon"
        bbox: String,
        /// Where to write the bincode graph + address-index snapshot.
        #[arg(long)]
        output: PathBuf,
        /// Directory for the raw Overpass response cache.
        #[arg(long, default_value = "./cache/overpass")]
        cache_dir: PathBuf,
    },
    /// Find a route between two endpoints against a built snapshot.
    Route {
        /// Path to a snapshot produced by `build`.
        snapshot: PathBuf,
        /// Node ID, "lat,lon", or free-text address.
        #[arg(long)]
        from: String,
        /// Node ID, "lat,lon", or free-text address.
        #[arg(long)]
        to: String,
        /// "normal", "rain", or "flood".
        #[arg(long, default_value = "normal")]
        weather: String,
        /// GeoJSON FeatureCollection files of hard obstructions.
        #[arg(long = "block")]
        blocking_geometries: Vec<PathBuf>,
        /// GeoJSON FeatureCollection files of flood zones.
        #[arg(long = "flood-area")]
        flood_areas: Vec<PathBuf>,
    },
    /// Start the HTTP API server over a built snapshot.
    Serve {
        /// Path to a snapshot produced by `build`.
        snapshot: PathBuf,
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}
