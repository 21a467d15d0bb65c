//! Road class coefficients and weather multipliers.
//!
//! `weight(class, weather) = c_highway(class) * c_context(class, weather)` is
//! the per-meter multiplier the A* search scales edge length by. Both tables
//! are fixed data, not configuration: changing them changes what "shortest"
//! means, and the heuristic constant in [`min_coefficient_product`] must be
//! re-derived if they ever do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use weathergraph_common::Error;

/// The fourteen routable road classes, in the order §6's tables list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighwayClass {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Residential,
    LivingStreet,
    Unclassified,
    Service,
}

use HighwayClass::*;

const ALL_CLASSES: [HighwayClass; 14] = [
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Residential,
    LivingStreet,
    Unclassified,
    Service,
];

impl HighwayClass {
    fn index(self) -> usize {
        self as usize
    }

    /// Base coefficient: lower is preferred by A*.
    pub fn c_highway(self) -> f64 {
        C_HIGHWAY[self.index()]
    }

    /// Design speed in km/h, used for duration estimates.
    pub fn speed_kmh(self) -> f64 {
        SPEED_KMH[self.index()]
    }

    pub fn as_str(self) -> &'static str {
        OSM_TAGS[self.index()]
    }

    /// True if `highway` (after stripping a trailing `_link`'s own variant
    /// is kept distinct) is one of the routable classes.
    pub fn from_osm_tag(highway: &str) -> Option<Self> {
        OSM_TAGS
            .iter()
            .position(|tag| *tag == highway)
            .map(|i| ALL_CLASSES[i])
    }
}

impl fmt::Display for HighwayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighwayClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_osm_tag(s).ok_or_else(|| Error::InvalidInput(format!("unknown highway class {s:?}")))
    }
}

const OSM_TAGS: [&str; 14] = [
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

const C_HIGHWAY: [f64; 14] = [
    0.70, 0.75, 0.75, 0.80, 0.80, 0.85, 1.00, 1.05, 1.10, 1.15, 1.20, 1.30, 1.20, 1.50,
];

const SPEED_KMH: [f64; 14] = [
    100.0, 60.0, 80.0, 50.0, 60.0, 40.0, 50.0, 35.0, 40.0, 30.0, 30.0, 20.0, 30.0, 20.0,
];

/// Weather regimes the engine routes under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weather {
    Normal,
    Rain,
    Flood,
}

impl FromStr for Weather {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Weather::Normal),
            "rain" => Ok(Weather::Rain),
            "flood" => Ok(Weather::Flood),
            other => Err(Error::InvalidInput(format!("unknown weather regime {other:?}"))),
        }
    }
}

/// Rain multiplier per class, ranging 1.05 (motorway) to 2.5 (service).
const C_CONTEXT_RAIN: [f64; 14] = [
    1.05, 1.16, 1.27, 1.38, 1.50, 1.61, 1.72, 1.83, 1.94, 2.05, 2.17, 2.28, 2.39, 2.50,
];

/// Flood multiplier per class, ranging 1.1 (motorway) to 5.0 (service).
const C_CONTEXT_FLOOD: [f64; 14] = [
    1.1, 1.4, 1.7, 2.0, 2.3, 2.6, 2.9, 3.2, 3.5, 3.8, 4.1, 4.4, 4.7, 5.0,
];

/// Weather multiplier for a class: 1.0 for every class under `Normal`.
pub fn c_context(class: HighwayClass, weather: Weather) -> f64 {
    match weather {
        Weather::Normal => 1.0,
        Weather::Rain => C_CONTEXT_RAIN[class.index()],
        Weather::Flood => C_CONTEXT_FLOOD[class.index()],
    }
}

/// `c_highway(class) * c_context(class, weather)`, the per-meter multiplier
/// edge length is scaled by before entering A*.
pub fn coefficient(class: HighwayClass, weather: Weather) -> f64 {
    class.c_highway() * c_context(class, weather)
}

/// The minimum coefficient across every class and every weather regime.
/// `Weather::Normal` always wins since every `c_context` is ≥ 1.0, so this
/// reduces to the smallest `c_highway`, but it is computed exhaustively
/// rather than hardcoded so a future change to either table cannot silently
/// invalidate the heuristic without this value moving too.
pub fn min_coefficient_product() -> f64 {
    let weathers = [Weather::Normal, Weather::Rain, Weather::Flood];
    ALL_CLASSES
        .iter()
        .flat_map(|&class| weathers.iter().map(move |&w| coefficient(class, w)))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_osm_tag() {
        for class in ALL_CLASSES {
            assert_eq!(HighwayClass::from_osm_tag(class.as_str()), Some(class));
        }
    }

    #[test]
    fn unknown_tag_returns_none() {
        assert_eq!(HighwayClass::from_osm_tag("footway"), None);
    }

    #[test]
    fn context_is_monotone_across_weathers() {
        for class in ALL_CLASSES {
            let normal = c_context(class, Weather::Normal);
            let rain = c_context(class, Weather::Rain);
            let flood = c_context(class, Weather::Flood);
            assert!(normal <= rain, "{class} normal > rain");
            assert!(rain <= flood, "{class} rain > flood");
        }
    }

    #[test]
    fn minimum_coefficient_is_motorway_normal() {
        let min = min_coefficient_product();
        assert!((min - 0.70).abs() < 1e-9);
        assert!(min <= coefficient(Motorway, Weather::Normal) + 1e-12);
    }

    #[test]
    fn weather_from_str_rejects_unknown() {
        assert!("monsoon".parse::<Weather>().is_err());
        assert_eq!("flood".parse::<Weather>().unwrap(), Weather::Flood);
    }
}
