//! OSM ingest: fetch a bounding box from Overpass (with disk caching and
//! mirror fallback) and hand back parsed nodes and ways for the graph
//! builder to consume.

pub mod cache;
pub mod model;
pub mod overpass;

pub use model::{Bbox, OsmData, OsmNode, OsmWay};

use tracing::info;
use weathergraph_common::Result;

/// Fetch `bbox`, serving from `cache_dir` when possible and falling back to
/// Overpass (then populating the cache) on a miss.
pub async fn ingest(client: &reqwest::Client, cache_dir: &std::path::Path, bbox: &Bbox) -> Result<OsmData> {
    if let Some(cached) = cache::load(cache_dir, bbox) {
        info!(bbox = %bbox.cache_key_input(), "osm cache hit");
        return Ok(cached);
    }

    info!(bbox = %bbox.cache_key_input(), "osm cache miss, querying overpass");
    let data = overpass::fetch(client, bbox).await?;
    cache::store(cache_dir, bbox, &data);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ingest_serves_from_cache_on_second_call() {
        let dir = tempfile::tempdir().unwrap();
        let bbox = Bbox::new(21.0, 105.8, 21.001, 105.801);
        let mut data = OsmData::default();
        data.nodes.insert(
            1,
            model::OsmNode {
                id: 1,
                lat: 21.0005,
                lon: 105.8005,
                tags: Default::default(),
            },
        );
        cache::store(dir.path(), &bbox, &data);

        let client = reqwest::Client::new();
        let loaded = ingest(&client, dir.path(), &bbox).await.unwrap();
        assert_eq!(loaded.nodes.len(), 1);
    }
}
