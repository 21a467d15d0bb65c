//! Reads GeoJSON obstruction files from disk, accepting either a bare
//! `Feature` or a `FeatureCollection` per file.

use std::path::Path;

use anyhow::{Context, Result};
use geojson::GeoJson;

pub fn load_all(paths: &[std::path::PathBuf]) -> Result<Vec<geojson::Feature>> {
    let mut features = Vec::new();
    for path in paths {
        features.extend(load_one(path)?);
    }
    Ok(features)
}

fn load_one(path: &Path) -> Result<Vec<geojson::Feature>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed: GeoJson = text.parse().with_context(|| format!("parsing GeoJSON in {}", path.display()))?;
    Ok(match parsed {
        GeoJson::Feature(f) => vec![f],
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Geometry(g) => vec![geojson::Feature {
            bbox: None,
            geometry: Some(g),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    })
}
