//! Disk cache for raw Overpass responses, keyed by SHA1 of the bbox at
//! 6-decimal precision, mirroring the Python prototype's
//! `_get_cache_key` / `_load_from_cache` / `_save_to_cache`.

use std::fs;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use tracing::warn;

use crate::model::{Bbox, OsmData};

pub fn cache_key(bbox: &Bbox) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bbox.cache_key_input().as_bytes());
    hex::encode(hasher.finalize())
}

fn cache_path(cache_dir: &Path, bbox: &Bbox) -> PathBuf {
    cache_dir.join(format!("{}.json", cache_key(bbox)))
}

/// Load a cached response for this bbox, if present and parseable.
pub fn load(cache_dir: &Path, bbox: &Bbox) -> Option<OsmData> {
    let path = cache_path(cache_dir, bbox);
    let bytes = fs::read(&path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse OSM cache entry, ignoring");
            None
        }
    }
}

/// Persist a response for this bbox. Failures are logged, not fatal: a
/// cache write failure should not fail an otherwise-successful ingest.
pub fn store(cache_dir: &Path, bbox: &Bbox, data: &OsmData) {
    if let Err(e) = fs::create_dir_all(cache_dir) {
        warn!(error = %e, "failed to create OSM cache directory");
        return;
    }
    let path = cache_path(cache_dir, bbox);
    match serde_json::to_vec(data) {
        Ok(bytes) => {
            if let Err(e) = fs::write(&path, bytes) {
                warn!(path = %path.display(), error = %e, "failed to write OSM cache entry");
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize OSM data for caching"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn cache_key_is_stable_for_same_bbox() {
        let bbox = Bbox::new(21.0, 105.8, 21.1, 105.9);
        assert_eq!(cache_key(&bbox), cache_key(&bbox));
    }

    #[test]
    fn cache_key_rounds_to_six_decimals() {
        let a = Bbox::new(21.000_0001, 105.8, 21.1, 105.9);
        let b = Bbox::new(21.000_0002, 105.8, 21.1, 105.9);
        assert_eq!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let bbox = Bbox::new(21.0, 105.8, 21.1, 105.9);
        let mut data = OsmData::default();
        data.nodes.insert(
            1,
            crate::model::OsmNode {
                id: 1,
                lat: 21.05,
                lon: 105.85,
                tags: HashMap::new(),
            },
        );

        assert!(load(dir.path(), &bbox).is_none());
        store(dir.path(), &bbox, &data);
        let loaded = load(dir.path(), &bbox).expect("cache hit");
        assert_eq!(loaded.nodes.len(), 1);
    }
}
