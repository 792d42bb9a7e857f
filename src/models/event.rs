//! Catalog events and ranked search results.

use super::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event as known to the external catalog (read-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEvent {
    /// Catalog identifier.
    pub id: String,
    /// Event title.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Start time, if published.
    pub start_time: Option<DateTime<Utc>>,
    /// End time, if published.
    pub end_time: Option<DateTime<Utc>>,
    /// Venue name.
    pub venue: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Venue coordinates.
    pub coordinates: Option<Coordinates>,
    /// Catalog category.
    pub category: Option<String>,
    /// Catalog tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ticket price (0 for free events).
    pub price: Option<f64>,
    /// ISO currency code.
    pub currency: Option<String>,
    /// Canonical listing URL at the source.
    pub source_url: Option<String>,
}

impl CatalogEvent {
    /// Creates an event with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            start_time: None,
            end_time: None,
            venue: None,
            address: None,
            city: None,
            coordinates: None,
            category: None,
            tags: Vec::new(),
            price: None,
            currency: None,
            source_url: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the price.
    #[must_use]
    pub const fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the venue coordinates.
    #[must_use]
    pub const fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

/// A catalog event decorated for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEvent {
    /// The underlying event.
    #[serde(flatten)]
    pub event: CatalogEvent,
    /// Distance from the search centre, when the venue is geolocated.
    pub distance_km: Option<f64>,
    /// Outbound link carrying campaign tracking parameters.
    pub tracked_url: String,
}

/// Outcome of a retrieval call.
///
/// Upstream failures are reported here rather than raised, so callers can
/// decide their own retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Whether the catalog call succeeded.
    pub success: bool,
    /// Ranked events, truncated to the requested limit.
    pub events: Vec<RankedEvent>,
    /// Number of candidates that survived filtering, before truncation.
    pub total_found: usize,
    /// Centre actually used for the query.
    pub center: Option<Coordinates>,
    /// Error message when `success` is false.
    pub error: Option<String>,
}

impl SearchOutcome {
    /// A failed outcome.
    #[must_use]
    pub fn failure(error: impl Into<String>, center: Option<Coordinates>) -> Self {
        Self {
            success: false,
            events: Vec::new(),
            total_found: 0,
            center,
            error: Some(error.into()),
        }
    }
}
