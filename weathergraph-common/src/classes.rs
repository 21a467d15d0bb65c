//! The road classes this engine routes over. Shared by the OSM ingest query
//! builder, the graph builder's way filter, and the weight tables so the
//! three never drift out of sync.

/// Allowed `highway=*` values, in the order §6's coefficient table lists
/// them. Anything else (`footway`, `cycleway`, `steps`, `construction`, ...)
/// is dropped by the graph builder's way filter.
pub const ALLOWED_HIGHWAY_CLASSES: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "residential",
    "living_street",
    "unclassified",
    "service",
];

pub fn is_allowed_class(highway: &str) -> bool {
    ALLOWED_HIGHWAY_CLASSES.contains(&highway)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footway_is_not_allowed() {
        assert!(!is_allowed_class("footway"));
        assert!(!is_allowed_class("cycleway"));
        assert!(!is_allowed_class("steps"));
    }

    #[test]
    fn residential_is_allowed() {
        assert!(is_allowed_class("residential"));
        assert!(is_allowed_class("motorway_link"));
    }
}
