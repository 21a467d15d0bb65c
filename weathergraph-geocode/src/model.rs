//! Address entries: the unit the full-text index and house-number
//! interpolation both operate over.

use serde::{Deserialize, Serialize};
use weathergraph_graph::NodeIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressKind {
    Street,
    House,
    Poi,
}

impl AddressKind {
    /// Base ranking priority: street=100, poi=80, house=50.
    pub fn rank_tier(self) -> u8 {
        match self {
            AddressKind::Street => 100,
            AddressKind::Poi => 80,
            AddressKind::House => 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressEntry {
    pub node: NodeIdx,
    pub lat: f64,
    pub lon: f64,
    pub address_text: String,
    pub house_number: Option<i64>,
    pub street_name: Option<String>,
    pub kind: AddressKind,
}

/// One search result: the matched entry plus a 0-100 relevance score.
#[derive(Debug, Clone)]
pub struct AddressMatch {
    pub entry_index: usize,
    pub score: f64,
}
