//! Parsed Overpass data: nodes and ways keyed by OSM ID, tags intact.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A geographic bounding box: (min_lat, min_lon, max_lat, max_lon).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bbox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// The 6-decimal-precision string this bbox's cache key is hashed from.
    pub fn cache_key_input(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsmNode {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsmWay {
    pub id: i64,
    /// Ordered node IDs as they appear in the way.
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsmData {
    pub nodes: HashMap<i64, OsmNode>,
    pub ways: Vec<OsmWay>,
}

impl OsmWay {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn highway(&self) -> Option<&str> {
        self.tag("highway")
    }
}

impl OsmNode {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
