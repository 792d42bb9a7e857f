//! Retrieval filtering, ranking and truncation against a canned catalog.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use eventsense::catalog::{CatalogQuery, RawEvent};
use eventsense::services::{RetrievalConfig, SearchOptions};
use eventsense::{
    Budget, Coordinates, EventCatalog, EventRetrievalService, Result, SearchSpec,
    TrackedLinkBuilder,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CannedCatalog {
    events: Vec<RawEvent>,
    last_query: Mutex<Option<CatalogQuery>>,
}

impl EventCatalog for CannedCatalog {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<RawEvent>> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        Ok(self.events.clone())
    }
}

fn raw(id: usize, name: &str, tags: &[&str]) -> RawEvent {
    RawEvent {
        id: format!("evt-{id}"),
        name: name.to_string(),
        tags: tags.iter().map(ToString::to_string).collect(),
        ..RawEvent::default()
    }
}

/// Ten music events interleaved with five others.
fn mixed_catalog() -> Arc<CannedCatalog> {
    let mut events = Vec::new();
    for i in 0..15 {
        if i % 3 == 2 {
            events.push(raw(i, "Pottery wheel basics", &["Arts & Crafts"]));
        } else {
            events.push(raw(i, "Live set", &["Music"]));
        }
    }
    Arc::new(CannedCatalog {
        events,
        ..CannedCatalog::default()
    })
}

fn service(catalog: &Arc<CannedCatalog>) -> EventRetrievalService {
    let links = TrackedLinkBuilder::new("https://events.example", "s", "m", "c").unwrap();
    EventRetrievalService::new(Arc::clone(catalog) as Arc<dyn EventCatalog>, links)
}

#[test]
fn test_music_filter_counts_before_truncation() {
    let catalog = mixed_catalog();
    let spec = SearchSpec::builder().tags(["Music"]).limit(4).build();
    let outcome = service(&catalog).search(&spec, &SearchOptions::default());

    assert!(outcome.success);
    assert_eq!(outcome.total_found, 10);
    assert_eq!(outcome.events.len(), 4);
    assert!(
        outcome
            .events
            .iter()
            .all(|e| e.event.tags.contains(&"Music".to_string()))
    );
}

#[test]
fn test_no_tags_keeps_everything() {
    let catalog = mixed_catalog();
    let spec = SearchSpec::builder().limit(20).build();
    let outcome = service(&catalog).search(&spec, &SearchOptions::default());
    assert_eq!(outcome.total_found, 15);
    assert_eq!(catalog.last_query.lock().unwrap().as_ref().unwrap().limit, 20);
}

#[test]
fn test_ranking_prefers_name_hits() {
    let catalog = Arc::new(CannedCatalog {
        events: vec![
            raw(1, "Sunday brunch", &["Food"]),
            raw(2, "Acoustic evening", &["Music", "acoustic"]),
            raw(3, "Acoustic guitar night", &["Music"]),
        ],
        ..CannedCatalog::default()
    });
    let spec = SearchSpec::builder().limit(3).build();
    let options = SearchOptions {
        query_text: Some("acoustic guitar".to_string()),
        coordinates: None,
    };
    let outcome = service(&catalog).search(&spec, &options);
    let ids: Vec<&str> = outcome.events.iter().map(|e| e.event.id.as_str()).collect();
    assert_eq!(ids, ["evt-3", "evt-2", "evt-1"]);
}

#[test]
fn test_budget_filter_applies_after_tags() {
    let mut cheap = raw(1, "Open mic", &["Music"]);
    cheap.price = Some(150.0);
    let mut pricey = raw(2, "Symphony", &["Music"]);
    pricey.price = Some(1800.0);
    let unpriced = raw(3, "Busking", &["Music"]);

    let catalog = Arc::new(CannedCatalog {
        events: vec![cheap, pricey, unpriced],
        ..CannedCatalog::default()
    });
    let spec = SearchSpec::builder()
        .tags(["Music"])
        .budget(Budget::budget(500.0))
        .limit(5)
        .build();
    let outcome = service(&catalog).search(&spec, &SearchOptions::default());
    let ids: Vec<&str> = outcome.events.iter().map(|e| e.event.id.as_str()).collect();
    assert_eq!(ids, ["evt-1", "evt-3"]);
    assert_eq!(outcome.total_found, 2);
}

#[test]
fn test_custom_overfetch_and_fallback_city() {
    let catalog = mixed_catalog();
    let goa = Coordinates::new(15.2993, 74.1240);
    let svc = service(&catalog).with_config(RetrievalConfig {
        overfetch_factor: 10,
        min_overfetch: 5,
        fallback_city: "Goa".to_string(),
        fallback_center: goa,
    });
    let spec = SearchSpec::builder().tags(["Music"]).limit(2).build();
    let outcome = svc.search(&spec, &SearchOptions::default());

    let query = catalog.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.limit, 20);
    assert_eq!(query.center, goa);
    assert_eq!(outcome.center, Some(goa));
}
