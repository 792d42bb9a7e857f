//! Event retrieval service.
//!
//! One catalog call per search. Candidates are over-fetched when they will be
//! filtered locally, then filtered by tag and price, optionally re-ranked
//! against the request text, and truncated to the requested limit.

use super::ranking::{filter_by_budget, filter_by_tags, rank_by_relevance};
use crate::catalog::{CatalogQuery, EventCatalog, TrackedLinkBuilder};
use crate::models::{Coordinates, RankedEvent, SearchOutcome, SearchSpec};
use std::sync::Arc;
use std::time::Instant;

/// Retrieval tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Multiplier applied to the limit when filtering locally.
    pub overfetch_factor: usize,
    /// Floor for the over-fetched candidate count.
    pub min_overfetch: usize,
    /// Name of the city used when no centre is known.
    pub fallback_city: String,
    /// Coordinates of the fallback city.
    pub fallback_center: Coordinates,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            overfetch_factor: 5,
            min_overfetch: 50,
            fallback_city: "Bangalore".to_string(),
            fallback_center: Coordinates::new(12.9716, 77.5946),
        }
    }
}

/// Per-call inputs that are not part of the [`SearchSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Original request text; enables relevance re-ranking.
    pub query_text: Option<String>,
    /// Explicit centre overriding the resolved location.
    pub coordinates: Option<Coordinates>,
}

/// Queries the catalog for a [`SearchSpec`] and ranks the results.
pub struct EventRetrievalService {
    catalog: Arc<dyn EventCatalog>,
    links: TrackedLinkBuilder,
    config: RetrievalConfig,
}

impl EventRetrievalService {
    /// Creates a service with default tuning.
    #[must_use]
    pub fn new(catalog: Arc<dyn EventCatalog>, links: TrackedLinkBuilder) -> Self {
        Self {
            catalog,
            links,
            config: RetrievalConfig::default(),
        }
    }

    /// Sets the tuning.
    #[must_use]
    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs a search.
    ///
    /// Catalog failures are reported through [`SearchOutcome::error`].
    pub fn search(&self, spec: &SearchSpec, options: &SearchOptions) -> SearchOutcome {
        let start = Instant::now();
        let center = self.center(spec, options);
        let query = self.catalog_query(spec, center);

        let raw = match self.catalog.fetch(&query) {
            Ok(raw) => {
                metrics::counter!("catalog_fetch_total", "status" => "success").increment(1);
                raw
            },
            Err(e) => {
                metrics::counter!("catalog_fetch_total", "status" => "error").increment(1);
                tracing::warn!(
                    catalog = self.catalog.name(),
                    error = %e,
                    "Catalog fetch failed"
                );
                return SearchOutcome::failure(e.to_string(), Some(center));
            },
        };
        let fetched = raw.len();

        let events: Vec<RankedEvent> = raw
            .into_iter()
            .map(|raw| {
                let event = raw.into_event();
                RankedEvent {
                    distance_km: event.coordinates.map(|c| center.distance_km(&c)),
                    tracked_url: self.links.event_url(&event.id),
                    event,
                }
            })
            .collect();

        let events = filter_by_tags(events, spec.tags());
        let mut events = filter_by_budget(events, spec.budget());
        if let Some(text) = options.query_text.as_deref() {
            rank_by_relevance(&mut events, text);
        }

        let total_found = events.len();
        events.truncate(spec.limit());

        tracing::info!(
            catalog = self.catalog.name(),
            fetched,
            total_found,
            returned = events.len(),
            duration_ms = start.elapsed().as_millis(),
            "Search completed"
        );

        SearchOutcome {
            success: true,
            events,
            total_found,
            center: Some(center),
            error: None,
        }
    }

    /// Explicit centre, then the resolved location, then the fallback city.
    fn center(&self, spec: &SearchSpec, options: &SearchOptions) -> Coordinates {
        if let Some(explicit) = options.coordinates.filter(Coordinates::is_valid) {
            return explicit;
        }
        if let Some(resolved) = spec.coordinates() {
            return resolved;
        }
        tracing::warn!(
            fallback_city = %self.config.fallback_city,
            "No location resolved, using fallback city"
        );
        self.config.fallback_center
    }

    fn catalog_query(&self, spec: &SearchSpec, center: Coordinates) -> CatalogQuery {
        let filters_locally = !spec.tags().is_empty() || spec.budget().is_constraining();
        let limit = if filters_locally {
            spec.limit()
                .saturating_mul(self.config.overfetch_factor)
                .max(self.config.min_overfetch)
        } else {
            spec.limit()
        };
        CatalogQuery {
            center,
            radius_km: spec.radius_km(),
            sort: spec.sort(),
            limit,
            offset: 0,
            start_date: spec.time().map(|t| t.start),
            end_date: spec.time().map(|t| t.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawEvent;
    use crate::{Error, Result};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCatalog {
        events: Vec<RawEvent>,
        fail: bool,
        queries: Mutex<Vec<CatalogQuery>>,
    }

    impl EventCatalog for RecordingCatalog {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn fetch(&self, query: &CatalogQuery) -> Result<Vec<RawEvent>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(Error::operation("catalog_request", "connection refused"));
            }
            Ok(self.events.clone())
        }
    }

    fn raw(id: &str, tags: &[&str]) -> RawEvent {
        RawEvent {
            id: id.to_string(),
            name: format!("event {id}"),
            tags: tags.iter().map(ToString::to_string).collect(),
            latitude: Some(12.97),
            longitude: Some(77.60),
            ..RawEvent::default()
        }
    }

    fn links() -> TrackedLinkBuilder {
        TrackedLinkBuilder::new("https://site.example", "bot", "social", "test").unwrap()
    }

    fn service(catalog: &Arc<RecordingCatalog>) -> EventRetrievalService {
        EventRetrievalService::new(Arc::clone(catalog) as Arc<dyn EventCatalog>, links())
    }

    #[test]
    fn test_overfetch_only_when_filtering() {
        let catalog = Arc::new(RecordingCatalog::default());
        let svc = service(&catalog);

        svc.search(&SearchSpec::builder().limit(3).build(), &SearchOptions::default());
        svc.search(
            &SearchSpec::builder().limit(3).tags(["Music"]).build(),
            &SearchOptions::default(),
        );
        svc.search(
            &SearchSpec::builder().limit(15).tags(["Music"]).build(),
            &SearchOptions::default(),
        );

        let queries = catalog.queries.lock().unwrap();
        assert_eq!(queries[0].limit, 3);
        assert_eq!(queries[1].limit, 50);
        assert_eq!(queries[2].limit, 75);
    }

    #[test]
    fn test_fallback_center() {
        let catalog = Arc::new(RecordingCatalog::default());
        let outcome = service(&catalog).search(&SearchSpec::builder().build(), &SearchOptions::default());
        assert_eq!(outcome.center, Some(RetrievalConfig::default().fallback_center));
    }

    #[test]
    fn test_explicit_center_wins() {
        let catalog = Arc::new(RecordingCatalog::default());
        let explicit = Coordinates::new(15.49, 73.82);
        let spec = SearchSpec::builder()
            .coordinates(Some(Coordinates::new(19.07, 72.87)))
            .build();
        let outcome = service(&catalog).search(
            &spec,
            &SearchOptions {
                coordinates: Some(explicit),
                ..SearchOptions::default()
            },
        );
        assert_eq!(outcome.center, Some(explicit));
        assert_eq!(catalog.queries.lock().unwrap()[0].center, explicit);
    }

    #[test]
    fn test_catalog_failure_is_reported() {
        let catalog = Arc::new(RecordingCatalog {
            fail: true,
            ..RecordingCatalog::default()
        });
        let outcome = service(&catalog).search(&SearchSpec::builder().build(), &SearchOptions::default());
        assert!(!outcome.success);
        assert!(outcome.events.is_empty());
        assert!(outcome.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_decoration() {
        let catalog = Arc::new(RecordingCatalog {
            events: vec![raw("e1", &["Music"])],
            ..RecordingCatalog::default()
        });
        let spec = SearchSpec::builder()
            .coordinates(Some(Coordinates::new(12.97, 77.60)))
            .build();
        let outcome = service(&catalog).search(&spec, &SearchOptions::default());
        let event = &outcome.events[0];
        assert!(event.distance_km.unwrap() < 0.01);
        assert!(event.tracked_url.starts_with("https://site.example/events/e1?utm_source=bot"));
    }

    #[test]
    fn test_time_window_is_forwarded() {
        let catalog = Arc::new(RecordingCatalog::default());
        let day = chrono::NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let spec = SearchSpec::builder()
            .time(Some(crate::models::TimeFilter::range(day, day.succ_opt().unwrap())))
            .build();
        service(&catalog).search(&spec, &SearchOptions::default());

        let query = &catalog.queries.lock().unwrap()[0];
        assert_eq!(query.start_date, Some(day));
        assert_eq!(query.end_date, day.succ_opt());
        assert_eq!(query.sort, crate::models::SortMode::Date);
    }
}
