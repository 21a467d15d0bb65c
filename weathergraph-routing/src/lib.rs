//! Routing facade: the top-level entry point a server or CLI calls to turn
//! an (origin, destination, weather, obstructions) query into a route.

pub mod context;
pub mod endpoint;
pub mod facade;

pub use context::Context;
pub use endpoint::{Endpoint, ResolvedEndpoint};
pub use facade::{route, RouteResult, TimingStats};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use weathergraph_osm::{OsmData, OsmNode, OsmWay};

    fn node(id: i64, lat: f64, lon: f64) -> OsmNode {
        OsmNode { id, lat, lon, tags: HashMap::new() }
    }

    fn way(id: i64, nodes: Vec<i64>) -> OsmWay {
        let mut tags = HashMap::new();
        tags.insert("highway".to_string(), "residential".to_string());
        OsmWay { id, nodes, tags }
    }

    fn sample_osm() -> OsmData {
        let mut osm = OsmData::default();
        osm.nodes.insert(1, node(1, 0.0, 0.0));
        osm.nodes.insert(2, node(2, 0.0, 1.0));
        osm.nodes.insert(3, node(3, 0.0, 2.0));
        osm.ways.push(way(100, vec![1, 2]));
        osm.ways.push(way(101, vec![2, 3]));
        osm
    }

    #[test]
    fn node_to_node_route_succeeds() {
        let osm = sample_osm();
        let ctx = Context::build(&osm).unwrap();

        let result = route(
            &ctx,
            Endpoint::NodeId(1),
            Endpoint::NodeId(3),
            weathergraph_weights::Weather::Normal,
            &[],
            &[],
            None,
        )
        .unwrap();

        assert_eq!(result.path, vec![1, 3]);
        assert!(result.distance_m > 0.0);
    }

    #[test]
    fn same_endpoint_is_rejected() {
        let osm = sample_osm();
        let ctx = Context::build(&osm).unwrap();

        let result = route(
            &ctx,
            Endpoint::NodeId(1),
            Endpoint::NodeId(1),
            weathergraph_weights::Weather::Normal,
            &[],
            &[],
            None,
        );
        assert!(matches!(result, Err(weathergraph_common::Error::SameEndpoint(1))));
    }

    #[test]
    fn unknown_node_id_is_rejected() {
        let osm = sample_osm();
        let ctx = Context::build(&osm).unwrap();

        let result = route(
            &ctx,
            Endpoint::NodeId(999),
            Endpoint::NodeId(3),
            weathergraph_weights::Weather::Normal,
            &[],
            &[],
            None,
        );
        assert!(matches!(result, Err(weathergraph_common::Error::UnknownEndpoint(999))));
    }

    #[test]
    fn coords_resolve_via_snap() {
        let osm = sample_osm();
        let ctx = Context::build(&osm).unwrap();

        let result = route(
            &ctx,
            Endpoint::Coords(0.0, 0.01),
            Endpoint::NodeId(3),
            weathergraph_weights::Weather::Normal,
            &[],
            &[],
            None,
        )
        .unwrap();
        assert!(result.resolved_origin.snapped);
        assert_eq!(result.resolved_origin.osm_id, 1);
    }
}
