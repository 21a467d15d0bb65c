//! Small geometry helpers shared by the graph, spatial, obstruction and
//! geocode crates. Kept dependency-free (no `geo` crate) so this crate stays
//! a leaf the rest of the workspace can build on without pulling in a
//! geometry stack just for a haversine call.

/// Mean Earth radius in meters, matching the constant used throughout the
/// OSM routing ecosystem (OSRM, Valhalla, and this workspace's own
/// `geo::HaversineDistance` usage elsewhere).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two (lat, lon) points in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Total haversine length of a (lon, lat) polyline.
pub fn polyline_length(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(w[0].1, w[0].0, w[1].1, w[1].0))
        .sum()
}

/// Orthogonal projection of point P onto segment AB, in the same (lon, lat)
/// coordinate space the rest of the workspace uses for polylines.
///
/// Returns `(t, projected_point, distance_meters)` where `t` is clamped to
/// `[0, 1]`. Distance is computed with haversine on the projected point, not
/// on the flat-plane projection, so it stays meaningful at city scale.
pub fn project_point_to_segment(
    p: (f64, f64),
    a: (f64, f64),
    b: (f64, f64),
) -> (f64, (f64, f64), f64) {
    let (px, py) = p;
    let (ax, ay) = a;
    let (bx, by) = b;
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        let dist = haversine_distance(py, px, ay, ax);
        return (0.0, a, dist);
    }

    let t = ((px - ax) * dx + (py - ay) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let proj = (ax + t * dx, ay + t * dy);
    let dist = haversine_distance(py, px, proj.1, proj.0);
    (t, proj, dist)
}

/// Coordinate-equality check at the 1e-6 degree tolerance invariant used
/// across the graph and path-reconstruction invariants.
pub fn coords_close(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_one_degree_latitude_is_about_111km() {
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn projection_clamps_to_segment_endpoints() {
        let (t, proj, _) = project_point_to_segment((5.0, 5.0), (0.0, 0.0), (1.0, 0.0));
        assert_eq!(t, 1.0);
        assert_eq!(proj, (1.0, 0.0));
    }

    #[test]
    fn projection_midpoint() {
        let (t, proj, _) = project_point_to_segment((0.5, 1.0), (0.0, 0.0), (1.0, 0.0));
        assert!((t - 0.5).abs() < 1e-9);
        assert!((proj.0 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn coords_close_respects_tolerance() {
        assert!(coords_close((1.0, 2.0), (1.0000001, 2.0000001)));
        assert!(!coords_close((1.0, 2.0), (1.001, 2.0)));
    }
}
