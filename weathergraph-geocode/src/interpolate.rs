//! §4.6 house-number interpolation: `"<N> <street>"` → coordinates, with
//! linear interpolation between the nearest bracketing house numbers and an
//! edge-projection fallback for attaching the result to the graph.

use weathergraph_common::geo::project_point_to_segment;
use weathergraph_graph::{EdgeIdx, Graph, NodeIdx};
use weathergraph_spatial::EdgeIndex;

use crate::index::AddressIndex;
use crate::model::AddressKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMethod {
    Exact,
    Interpolated,
    FallbackLower,
    FallbackUpper,
}

#[derive(Debug, Clone)]
pub struct InterpolatedPoint {
    pub lat: f64,
    pub lon: f64,
    pub method: InterpolationMethod,
}

#[derive(Debug, Clone)]
pub struct VirtualNode {
    pub lat: f64,
    pub lon: f64,
    /// The two graph nodes bracketing the projected point on its edge,
    /// each with their distance in meters to the projection.
    pub neighbors: Vec<(NodeIdx, f64)>,
}

/// Parse `"<N> <street>"`. Returns `None` if the input does not start with
/// a run of digits followed by at least one more token.
pub fn parse_house_query(input: &str) -> Option<(i64, String)> {
    let input = input.trim();
    let digit_end = input.find(|c: char| !c.is_ascii_digit())?;
    if digit_end == 0 {
        return None;
    }
    let number: i64 = input[..digit_end].parse().ok()?;
    let street = input[digit_end..].trim();
    if street.is_empty() {
        return None;
    }
    Some((number, street.to_string()))
}

/// Find the coordinates for house number `n` on `street`, per the
/// exact/interpolated/fallback rules in §4.6.
pub fn interpolate_house_number(index: &AddressIndex, street: &str, n: i64) -> Option<InterpolatedPoint> {
    let houses: Vec<&crate::model::AddressEntry> = (0..index.len())
        .map(|i| index.entry(i))
        .filter(|e| e.kind == AddressKind::House)
        .filter(|e| e.street_name.as_deref().map(|s| s.eq_ignore_ascii_case(street)).unwrap_or(false))
        .collect();

    if let Some(exact) = houses.iter().find(|e| e.house_number == Some(n)) {
        return Some(InterpolatedPoint {
            lat: exact.lat,
            lon: exact.lon,
            method: InterpolationMethod::Exact,
        });
    }

    let lower = houses
        .iter()
        .filter(|e| e.house_number.map(|h| h < n).unwrap_or(false))
        .max_by_key(|e| e.house_number.unwrap());
    let upper = houses
        .iter()
        .filter(|e| e.house_number.map(|h| h > n).unwrap_or(false))
        .min_by_key(|e| e.house_number.unwrap());

    match (lower, upper) {
        (Some(l), Some(u)) => {
            let l_num = l.house_number.unwrap() as f64;
            let u_num = u.house_number.unwrap() as f64;
            let t = (n as f64 - l_num) / (u_num - l_num);
            Some(InterpolatedPoint {
                lat: l.lat + (u.lat - l.lat) * t,
                lon: l.lon + (u.lon - l.lon) * t,
                method: InterpolationMethod::Interpolated,
            })
        }
        (Some(l), None) => Some(InterpolatedPoint {
            lat: l.lat,
            lon: l.lon,
            method: InterpolationMethod::FallbackLower,
        }),
        (None, Some(u)) => Some(InterpolatedPoint {
            lat: u.lat,
            lon: u.lon,
            method: InterpolationMethod::FallbackUpper,
        }),
        (None, None) => None,
    }
}

const PROJECTION_CUTOFF_M: f64 = 50.0;

/// Attach an interpolated point to the graph by projecting it onto the
/// closest edge within 50 m, reporting both endpoints and their distance to
/// the projection so the caller can pick the nearer as the graph anchor.
pub fn attach_to_graph(graph: &Graph, edge_index: &EdgeIndex, point: &InterpolatedPoint) -> Option<VirtualNode> {
    let envelope = rstar::AABB::from_corners(
        [point.lon - 0.001, point.lat - 0.001],
        [point.lon + 0.001, point.lat + 0.001],
    );
    let candidates = edge_index.candidates(envelope);

    let mut best: Option<(EdgeIdx, f64, (f64, f64))> = None;
    for edge_idx in candidates {
        let edge = graph.edge(edge_idx);
        for pair in edge.polyline.windows(2) {
            let a = pair[0];
            let b = pair[1];
            let (_, projected, dist_m) = project_point_to_segment((point.lon, point.lat), a, b);
            if best.map(|(_, best_dist, _)| dist_m < best_dist).unwrap_or(true) {
                best = Some((edge_idx, dist_m, projected));
            }
        }
    }

    let (edge_idx, dist_m, projected) = best?;
    if dist_m > PROJECTION_CUTOFF_M {
        return None;
    }

    let edge = graph.edge(edge_idx);
    let source = graph.node(edge.source);
    let target = graph.node(edge.target);
    let dist_to_source = weathergraph_common::geo::haversine_distance(projected.1, projected.0, source.lat, source.lon);
    let dist_to_target = weathergraph_common::geo::haversine_distance(projected.1, projected.0, target.lat, target.lon);

    Some(VirtualNode {
        lat: projected.1,
        lon: projected.0,
        neighbors: vec![(edge.source, dist_to_source), (edge.target, dist_to_target)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_number_and_street() {
        assert_eq!(
            parse_house_query("88 Phố X"),
            Some((88, "Phố X".to_string()))
        );
    }

    #[test]
    fn rejects_input_without_leading_digits() {
        assert_eq!(parse_house_query("Phố X"), None);
    }

    #[test]
    fn rejects_number_with_no_street() {
        assert_eq!(parse_house_query("88"), None);
    }
}
