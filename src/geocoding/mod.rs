//! Geocoding provider abstraction.
//!
//! The location resolver calls a [`Geocoder`] only for place names that are
//! not in its static table. The contract is a single call:
//! `(address, country bias) → match | not found | error`.
//!
//! | Outcome | Return |
//! |---------|--------|
//! | Match | `Ok(Some(GeocodeMatch))` |
//! | No match | `Ok(None)` |
//! | Network / API failure | `Err(Error::OperationFailed)` |
//!
//! There is no retry: callers apply their own policy.

mod google;

pub use google::GoogleGeocoder;

use crate::Result;
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Precision tier reported by the geocoding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeAccuracy {
    /// Exact street address.
    Rooftop,
    /// Interpolated between two precise points.
    RangeInterpolated,
    /// Centre of a line or polygon (street, neighborhood).
    GeometricCenter,
    /// Approximate area (locality, region).
    Approximate,
}

impl GeocodeAccuracy {
    /// Maps the provider's accuracy tier to a resolver confidence.
    #[must_use]
    pub const fn confidence(&self) -> f32 {
        match self {
            Self::Rooftop => 0.9,
            Self::RangeInterpolated => 0.85,
            Self::GeometricCenter => 0.8,
            Self::Approximate => 0.7,
        }
    }

    /// Parses a provider tier name; unknown tiers are treated as approximate.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "ROOFTOP" => Self::Rooftop,
            "RANGE_INTERPOLATED" => Self::RangeInterpolated,
            "GEOMETRIC_CENTER" => Self::GeometricCenter,
            _ => Self::Approximate,
        }
    }
}

/// A successful geocode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    /// Resolved coordinates.
    pub coordinates: Coordinates,
    /// Provider-formatted display name.
    pub formatted_name: String,
    /// Precision tier.
    pub accuracy: GeocodeAccuracy,
}

/// Trait for geocoding providers.
pub trait Geocoder: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Resolves a free-form place name.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or answers with a failure status.
    fn geocode(&self, address: &str, country_bias: &str) -> Result<Option<GeocodeMatch>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ROOFTOP", GeocodeAccuracy::Rooftop ; "rooftop")]
    #[test_case("range_interpolated", GeocodeAccuracy::RangeInterpolated ; "range interpolated")]
    #[test_case("GEOMETRIC_CENTER", GeocodeAccuracy::GeometricCenter ; "geometric centre")]
    #[test_case("APPROXIMATE", GeocodeAccuracy::Approximate ; "approximate")]
    #[test_case("SOMETHING_NEW", GeocodeAccuracy::Approximate ; "unknown tier")]
    fn test_accuracy_parse(input: &str, expected: GeocodeAccuracy) {
        assert_eq!(GeocodeAccuracy::parse(input), expected);
    }

    #[test]
    fn test_confidence_decreases_with_precision() {
        let tiers = [
            GeocodeAccuracy::Rooftop,
            GeocodeAccuracy::RangeInterpolated,
            GeocodeAccuracy::GeometricCenter,
            GeocodeAccuracy::Approximate,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].confidence() > pair[1].confidence());
        }
        assert!(tiers.iter().all(|t| (0.0..=1.0).contains(&t.confidence())));
    }
}
