//! Radius resolver.
//!
//! Priority, highest first:
//!
//! 1. Explicit distance (`within 7 km`, `3 miles away`) → that distance.
//! 2. Neighborhood location → 5 km.
//! 3. Proximity phrase: `nearby` → 3 km, `in the area` → 5 km,
//!    `anywhere in` / `throughout` → 25 km.
//! 4. Any resolved location → 20 km (city default).
//! 5. No location → 20 km, not detected.

#![allow(clippy::expect_used)]

use crate::models::{DEFAULT_RADIUS_KM, Extraction};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const KM_PER_MILE: f64 = 1.609_344;
const NEIGHBORHOOD_RADIUS_KM: f64 = 5.0;

/// What the radius was derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Distance stated in the request.
    Explicit,
    /// A curated neighborhood was named.
    Neighborhood,
    /// "nearby", "near me".
    Nearby,
    /// "in the area", "around here".
    Area,
    /// "anywhere in", "throughout".
    CityWide,
    /// A resolved location without a finer signal.
    City,
    /// No location at all.
    #[default]
    Default,
}

/// Value produced by the radius resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusMatch {
    /// Search radius, always positive.
    pub radius_km: f64,
    /// Signal that chose the radius.
    pub location_type: LocationType,
}

impl Default for RadiusMatch {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            location_type: LocationType::Default,
        }
    }
}

static EXPLICIT_DISTANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:within|in\s+a|under|less\s+than|up\s*to|max(?:imum)?|radius\s+of)\s+(\d+(?:\.\d+)?)\s*(km|kms|kilomet(?:er|re)s?|mi|miles?)\b",
    )
    .expect("static regex")
});

static DISTANCE_AWAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d+(?:\.\d+)?)\s*(km|kms|kilomet(?:er|re)s?|mi|miles?)\s+(?:radius|away|from|around|of)\b",
    )
    .expect("static regex")
});

/// (pattern, radius, class)
static PROXIMITY_PHRASES: LazyLock<Vec<(Regex, f64, LocationType)>> = LazyLock::new(|| {
    [
        (
            r"(?i)\b(nearby|near\s+me|close\s+by|close\s+to\s+me|walking\s+distance|around\s+me)\b",
            3.0,
            LocationType::Nearby,
        ),
        (
            r"(?i)\b(in\s+the\s+area|in\s+my\s+area|around\s+here|local(?:ly)?)\b",
            5.0,
            LocationType::Area,
        ),
        (
            r"(?i)\b(anywhere\s+in|throughout|across\s+the\s+city|all\s+over|city[-\s]?wide)\b",
            25.0,
            LocationType::CityWide,
        ),
    ]
    .into_iter()
    .map(|(pattern, km, class)| (Regex::new(pattern).expect("static regex"), km, class))
    .collect()
});

/// Resolves the search radius.
///
/// `location_name` is the resolved place, if any; `is_neighborhood` comes
/// from the location resolver.
pub fn resolve_radius(
    text: &str,
    location_name: Option<&str>,
    is_neighborhood: bool,
) -> Extraction<RadiusMatch> {
    if let Some(km) = explicit_distance(text) {
        return Extraction::detected(
            RadiusMatch {
                radius_km: km,
                location_type: LocationType::Explicit,
            },
            0.95,
            format!("explicit distance of {km} km"),
        );
    }

    if is_neighborhood {
        return Extraction::detected(
            RadiusMatch {
                radius_km: NEIGHBORHOOD_RADIUS_KM,
                location_type: LocationType::Neighborhood,
            },
            0.85,
            format!(
                "neighborhood search around {}",
                location_name.unwrap_or("the requested area")
            ),
        );
    }

    for (pattern, km, class) in PROXIMITY_PHRASES.iter() {
        if let Some(m) = pattern.find(text) {
            return Extraction::detected(
                RadiusMatch {
                    radius_km: *km,
                    location_type: *class,
                },
                0.8,
                format!("proximity phrase '{}'", m.as_str()),
            );
        }
    }

    match location_name {
        Some(name) => Extraction::detected(
            RadiusMatch {
                radius_km: DEFAULT_RADIUS_KM,
                location_type: LocationType::City,
            },
            0.7,
            format!("city-wide default around {name}"),
        ),
        None => Extraction::none(0.5, "no distance signal; default radius"),
    }
}

/// First positive, finite stated distance in kilometres.
fn explicit_distance(text: &str) -> Option<f64> {
    EXPLICIT_DISTANCE
        .captures_iter(text)
        .chain(DISTANCE_AWAY.captures_iter(text))
        .find_map(|caps| {
            let value: f64 = caps.get(1)?.as_str().parse().ok()?;
            let unit = caps.get(2)?.as_str().to_ascii_lowercase();
            let km = if unit.starts_with("mi") {
                value * KM_PER_MILE
            } else {
                value
            };
            (km.is_finite() && km > 0.0).then_some(km)
        })
}
