//! HTTP event catalog client.

use super::{CatalogQuery, EventCatalog, RawEvent};
use crate::http::{HttpConfig, build_http_client, error_kind};
use crate::{Error, Result};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Catalog reachable over a JSON `GET {base}/events` endpoint.
pub struct HttpEventCatalog {
    /// Base URL without the `/events` suffix.
    base_url: String,
    /// Optional API key, sent as `x-api-key`.
    api_key: Option<SecretString>,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl HttpEventCatalog {
    /// Creates a client for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            client: build_http_client(HttpConfig::default()),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Builds the request URL for a query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the base URL is not a valid URL.
    pub fn build_url(&self, query: &CatalogQuery) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/events", self.base_url.trim_end_matches('/')))
            .map_err(|e| Error::InvalidInput(format!("catalog base url '{}': {e}", self.base_url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("lat", &query.center.latitude.to_string())
                .append_pair("lng", &query.center.longitude.to_string())
                .append_pair("radius", &query.radius_km.to_string())
                .append_pair("sort", query.sort.as_str())
                .append_pair("limit", &query.limit.to_string())
                .append_pair("offset", &query.offset.to_string());
            if let Some(start) = query.start_date {
                pairs.append_pair("start_date", &start.format("%Y-%m-%d").to_string());
            }
            if let Some(end) = query.end_date {
                pairs.append_pair("end_date", &end.format("%Y-%m-%d").to_string());
            }
        }
        Ok(url)
    }
}

impl EventCatalog for HttpEventCatalog {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<RawEvent>> {
        let url = self.build_url(query)?;
        tracing::debug!(
            catalog = self.name(),
            limit = query.limit,
            radius_km = query.radius_km,
            sort = query.sort.as_str(),
            "Fetching catalog events"
        );

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key.expose_secret());
        }

        let response = request.send().map_err(|e| {
            tracing::warn!(
                catalog = self.name(),
                error = %e,
                error_kind = error_kind(&e),
                "Catalog request failed"
            );
            Error::operation("catalog_request", format!("{} error: {e}", error_kind(&e)))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::operation(
                "catalog_request",
                format!("API returned status: {status} - {body}"),
            ));
        }

        let body: CatalogResponse = response
            .json()
            .map_err(|e| Error::operation("catalog_response", e))?;
        Ok(body.into_events())
    }
}

/// Catalog payload: either a bare array or an object wrapping one.
///
/// Records are decoded one by one so a single malformed record is skipped
/// instead of failing the page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogResponse {
    List(Vec<serde_json::Value>),
    Wrapped {
        #[serde(alias = "data", alias = "results")]
        events: Vec<serde_json::Value>,
    },
}

impl CatalogResponse {
    fn into_events(self) -> Vec<RawEvent> {
        let (Self::List(records) | Self::Wrapped { events: records }) = self;
        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<RawEvent>(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::debug!(index, error = %e, "Skipping malformed catalog record");
                    None
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, SortMode};
    use chrono::NaiveDate;

    fn query() -> CatalogQuery {
        CatalogQuery {
            center: Coordinates::new(12.9352, 77.6245),
            radius_km: 5.0,
            sort: SortMode::Date,
            limit: 50,
            offset: 0,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 7),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 8),
        }
    }

    #[test]
    fn test_build_url() {
        let catalog = HttpEventCatalog::new("https://catalog.example/api/");
        let url = catalog.build_url(&query()).unwrap();
        assert_eq!(url.path(), "/api/events");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("sort".to_string(), "date".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "50".to_string())));
        assert!(pairs.contains(&("start_date".to_string(), "2026-03-07".to_string())));
        assert!(pairs.contains(&("radius".to_string(), "5".to_string())));
    }

    #[test]
    fn test_build_url_without_window() {
        let catalog = HttpEventCatalog::new("https://catalog.example");
        let mut q = query();
        q.start_date = None;
        q.end_date = None;
        let url = catalog.build_url(&q).unwrap();
        assert!(!url.as_str().contains("start_date"));
    }

    #[test]
    fn test_invalid_base_url() {
        let catalog = HttpEventCatalog::new("not a url");
        assert!(matches!(
            catalog.build_url(&query()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_response_shapes() {
        let list: CatalogResponse =
            serde_json::from_str(r#"[{"id": "1", "name": "a"}]"#).unwrap();
        assert_eq!(list.into_events().len(), 1);

        let wrapped: CatalogResponse =
            serde_json::from_str(r#"{"data": [{"id": "1", "name": "a"}, {"id": 2, "title": "b"}]}"#)
                .unwrap();
        assert_eq!(wrapped.into_events().len(), 2);
    }

    #[test]
    fn test_malformed_records_skipped_not_fatal() {
        let page: CatalogResponse = serde_json::from_str(
            r#"{"events": [
                {"name": "no id here"},
                {"id": "2", "name": "Open mic", "price": "500"},
                {"id": "3", "name": "Jam", "tags": null},
                {"id": "4", "name": "Gig", "tags": ["Music"], "price": 250}
            ]}"#,
        )
        .unwrap();
        let events = page.into_events();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "4"]);
        assert_eq!(events[0].price, Some(500.0));
        assert!(events[1].tags.is_empty());
        assert_eq!(events[2].tags, ["Music"]);
    }
}
