//! STRtree of edge polylines (§4.2 step 5), queried by the obstruction
//! resolver for candidate edges whose bounding box overlaps a blocking or
//! flood geometry.

use rstar::{RTree, RTreeObject, AABB};
use weathergraph_graph::{EdgeIdx, Graph};

struct IndexedEdge {
    idx: EdgeIdx,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn polyline_envelope(polyline: &[(f64, f64)]) -> AABB<[f64; 2]> {
    let (mut min_lon, mut min_lat) = (f64::INFINITY, f64::INFINITY);
    let (mut max_lon, mut max_lat) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &(lon, lat) in polyline {
        min_lon = min_lon.min(lon);
        max_lon = max_lon.max(lon);
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
    }
    AABB::from_corners([min_lon, min_lat], [max_lon, max_lat])
}

/// Bounding-box index over every directed edge's polyline.
pub struct EdgeIndex {
    tree: RTree<IndexedEdge>,
}

impl EdgeIndex {
    pub fn build(graph: &Graph) -> Self {
        let items = graph
            .edges
            .iter()
            .enumerate()
            .map(|(i, edge)| IndexedEdge {
                idx: EdgeIdx(i as u32),
                envelope: polyline_envelope(&edge.polyline),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// Edges whose bounding box intersects `envelope`. The caller still
    /// needs a precise geometric test against the actual polyline.
    pub fn candidates(&self, envelope: AABB<[f64; 2]>) -> Vec<EdgeIdx> {
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.idx)
            .collect()
    }
}
