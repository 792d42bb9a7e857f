//! External event catalog.
//!
//! Retrieval issues exactly one [`EventCatalog::fetch`] per search. The
//! contract is `(centre, radius, sort, limit, offset, window) → raw events`
//! or an error; there is no retry and no caching.

mod client;
mod tracking;

pub use client::HttpEventCatalog;
pub use tracking::{EntityType, TrackedLinkBuilder};

use crate::Result;
use crate::models::{CatalogEvent, Coordinates, SortMode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single remote catalog query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogQuery {
    /// Search centre.
    pub center: Coordinates,
    /// Search radius around the centre.
    pub radius_km: f64,
    /// Remote sort order.
    pub sort: SortMode,
    /// Candidates requested, already over-fetched when filtering locally.
    pub limit: usize,
    /// Records to skip, for paging.
    pub offset: usize,
    /// Inclusive start of the time window.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the time window.
    pub end_date: Option<NaiveDate>,
}

/// Trait for event catalog providers.
pub trait EventCatalog: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Fetches candidate events.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be reached or answers with a
    /// failure status.
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<RawEvent>>;
}

/// An event record as returned by the catalog.
///
/// Field names vary between catalog versions, hence the aliases. Malformed
/// optional fields decode as absent; a record missing its id or name fails
/// on its own and the client skips it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Catalog identifier; numeric ids become strings.
    #[serde(alias = "_id", alias = "event_id", deserialize_with = "string_or_number")]
    pub id: String,
    /// Event title.
    #[serde(alias = "title")]
    pub name: String,
    /// Free-text description.
    #[serde(default, alias = "summary")]
    pub description: Option<String>,
    /// Start time, when parseable.
    #[serde(
        default,
        alias = "start_date",
        alias = "starts_at",
        deserialize_with = "lenient_datetime"
    )]
    pub start_time: Option<DateTime<Utc>>,
    /// End time, when parseable.
    #[serde(
        default,
        alias = "end_date",
        alias = "ends_at",
        deserialize_with = "lenient_datetime"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Venue name.
    #[serde(default, alias = "venue_name")]
    pub venue: Option<String>,
    /// Street address.
    #[serde(default, alias = "venue_address")]
    pub address: Option<String>,
    /// City name.
    #[serde(default)]
    pub city: Option<String>,
    /// Latitude; numeric strings accepted.
    #[serde(default, alias = "lat", deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    /// Longitude; numeric strings accepted.
    #[serde(default, alias = "lng", alias = "lon", deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    /// Catalog category.
    #[serde(default)]
    pub category: Option<String>,
    /// Catalog tags; null or a comma-separated string accepted.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    /// Lowest ticket price; numeric strings accepted.
    #[serde(
        default,
        alias = "ticket_price",
        alias = "min_price",
        deserialize_with = "lenient_number"
    )]
    pub price: Option<f64>,
    /// Currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Upstream listing URL.
    #[serde(default, alias = "url", alias = "link")]
    pub source_url: Option<String>,
}

impl RawEvent {
    /// Maps the wire record to the internal event shape.
    #[must_use]
    pub fn into_event(self) -> CatalogEvent {
        let coordinates = self
            .latitude
            .zip(self.longitude)
            .map(|(lat, lon)| Coordinates::new(lat, lon))
            .filter(Coordinates::is_valid);
        CatalogEvent {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            start_time: self.start_time,
            end_time: self.end_time,
            venue: self.venue,
            address: self.address,
            city: self.city,
            coordinates,
            category: self.category,
            tags: self.tags,
            price: self.price.filter(|p| p.is_finite()),
            currency: self.currency,
            source_url: self.source_url,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

/// Numbers or numeric strings (`"500"`, `"1,200.50"`); anything else is absent.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned.parse::<f64>().ok()
        },
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// A string array, a comma-separated string, or null.
fn lenient_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(serde_json::Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_str).and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_event_aliases() {
        let raw: RawEvent = serde_json::from_str(
            r#"{
                "event_id": 42,
                "title": "Sunday Jazz Brunch",
                "venue_name": "The Humming Tree",
                "lat": 12.97,
                "lng": 77.64,
                "ticket_price": 0,
                "starts_at": "2026-03-08T06:30:00Z",
                "url": "https://tickets.example/42"
            }"#,
        )
        .unwrap();
        assert_eq!(raw.id, "42");
        assert_eq!(raw.name, "Sunday Jazz Brunch");

        let event = raw.into_event();
        assert!(event.coordinates.is_some());
        assert_eq!(event.price, Some(0.0));
        assert!(event.start_time.is_some());
        assert_eq!(event.description, "");
    }

    #[test]
    fn test_malformed_optional_fields_are_absent() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"id": "a", "name": "x", "start_time": "next tuesday", "end_time": 5, "lat": 200.0, "lng": 10.0}"#,
        )
        .unwrap();
        assert!(raw.start_time.is_none());
        assert!(raw.into_event().coordinates.is_none());
    }

    #[test]
    fn test_string_price_and_null_tags() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"id": "a", "name": "x", "price": "1,200", "tags": null, "lat": "12.9", "lng": 77.6}"#,
        )
        .unwrap();
        assert_eq!(raw.price, Some(1200.0));
        assert!(raw.tags.is_empty());
        assert_eq!(raw.latitude, Some(12.9));
    }

    #[test]
    fn test_unparseable_price_and_comma_tags() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"id": "a", "name": "x", "price": "TBA", "tags": "Music, Jazz/Blues,"}"#,
        )
        .unwrap();
        assert!(raw.price.is_none());
        assert_eq!(raw.tags, ["Music", "Jazz/Blues"]);
    }

    #[test]
    fn test_naive_datetime_format() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"id": "a", "name": "x", "start_time": "2026-03-08 18:00:00"}"#,
        )
        .unwrap();
        assert!(raw.start_time.is_some());
    }
}
