//! Local full-text address geocoder: extraction from parsed OSM, a
//! diacritic-folded prefix/substring/fuzzy index, and house-number
//! interpolation with edge-projection attachment.

pub mod extract;
pub mod index;
pub mod interpolate;
pub mod model;

pub use extract::extract;
pub use index::AddressIndex;
pub use interpolate::{attach_to_graph, interpolate_house_number, parse_house_query, InterpolatedPoint, InterpolationMethod, VirtualNode};
pub use model::{AddressEntry, AddressKind, AddressMatch};
