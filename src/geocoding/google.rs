//! Google Geocoding API client.

use super::{GeocodeAccuracy, GeocodeMatch, Geocoder};
use crate::http::{HttpConfig, build_http_client, error_kind};
use crate::models::Coordinates;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Google Geocoding API client.
pub struct GoogleGeocoder {
    /// API key.
    api_key: Option<SecretString>,
    /// API endpoint.
    endpoint: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GoogleGeocoder {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://maps.googleapis.com/maps/api/geocode/json";

    /// Creates a client reading `GOOGLE_MAPS_API_KEY` from the environment.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .map(SecretString::from);
        Self {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            client: build_http_client(HttpConfig::with_timeout_ms(5_000)),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }
}

impl Default for GoogleGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for GoogleGeocoder {
    fn name(&self) -> &'static str {
        "google"
    }

    fn geocode(&self, address: &str, country_bias: &str) -> Result<Option<GeocodeMatch>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::NotConfigured("GOOGLE_MAPS_API_KEY not set".to_string()))?;

        let mut query = vec![
            ("address", address.to_string()),
            ("key", api_key.expose_secret().to_string()),
        ];
        if !country_bias.is_empty() {
            query.push(("region", country_bias.to_lowercase()));
            query.push(("components", format!("country:{}", country_bias.to_uppercase())));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .map_err(|e| {
                tracing::warn!(
                    provider = "google",
                    error = %e,
                    error_kind = error_kind(&e),
                    "Geocoding request failed"
                );
                Error::operation("geocode_request", format!("{} error: {e}", error_kind(&e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::operation(
                "geocode_request",
                format!("API returned status: {status}"),
            ));
        }

        let body: GeocodeResponse = response
            .json()
            .map_err(|e| Error::operation("geocode_response", e))?;

        parse_geocode_response(body)
    }
}

/// Response from the Geocoding API.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
    #[serde(default)]
    location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Maps the API status and first result to the geocoder contract.
fn parse_geocode_response(body: GeocodeResponse) -> Result<Option<GeocodeMatch>> {
    match body.status.as_str() {
        "OK" => Ok(body.results.into_iter().next().map(|result| GeocodeMatch {
            coordinates: Coordinates::new(
                result.geometry.location.lat,
                result.geometry.location.lng,
            ),
            formatted_name: result.formatted_address,
            accuracy: result
                .geometry
                .location_type
                .as_deref()
                .map_or(GeocodeAccuracy::Approximate, GeocodeAccuracy::parse),
        })),
        "ZERO_RESULTS" => Ok(None),
        status => Err(Error::operation(
            "geocode_response",
            format!(
                "status {status}: {}",
                body.error_message.unwrap_or_default()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Option<GeocodeMatch>> {
        parse_geocode_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_ok_response() {
        let result = parse(
            r#"{
                "status": "OK",
                "results": [{
                    "formatted_address": "Koramangala, Bengaluru, Karnataka, India",
                    "geometry": {
                        "location": {"lat": 12.9352, "lng": 77.6245},
                        "location_type": "APPROXIMATE"
                    }
                }]
            }"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(result.accuracy, GeocodeAccuracy::Approximate);
        assert!((result.coordinates.latitude - 12.9352).abs() < 1e-9);
        assert!(result.formatted_name.starts_with("Koramangala"));
    }

    #[test]
    fn test_parse_zero_results() {
        let result = parse(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_error_status() {
        let result = parse(r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let geocoder = GoogleGeocoder {
            api_key: None,
            endpoint: GoogleGeocoder::DEFAULT_ENDPOINT.to_string(),
            client: reqwest::blocking::Client::new(),
        };
        let result = geocoder.geocode("Koramangala", "in");
        assert!(matches!(result, Err(Error::NotConfigured(_))));
    }
}
