//! Location resolver.
//!
//! Finds a place phrase in the request and turns it into coordinates.
//!
//! # Candidate extraction
//!
//! 1. Surface patterns, tried in order: `in X`, `near X`, `around X`, then a
//!    capitalised `X events`. The first usable capture wins.
//! 2. A scan for any known city or neighborhood name.
//! 3. The caller's default city.
//!
//! # Resolution
//!
//! | Step | Source | Confidence |
//! |------|--------|------------|
//! | Exact static table hit | [`LocationSource::StaticTable`] | 0.95 |
//! | Known name inside the phrase | [`LocationSource::StaticTable`] | 0.9 |
//! | Geocoder match | [`LocationSource::Geocoder`] | accuracy tier |
//! | Nothing | `detected = false`, `error` set | 0.0 to 0.2 |

#![allow(clippy::expect_used)]

mod places;

use super::patterns::{GENERIC_PLACES, PLACE_BOUNDARY_WORDS, STOP_WORDS, find_word};
use crate::geocoding::Geocoder;
use crate::models::{Coordinates, Extraction};
use crate::taxonomy::{Taxonomy, TaxonomyLevel};
use places::{Place, PlaceKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Confidence for an exact static-table hit.
const STATIC_EXACT_CONFIDENCE: f32 = 0.95;
/// Confidence when the phrase only contains a known name.
const STATIC_CONTAINED_CONFIDENCE: f32 = 0.9;
/// Most words kept from a single capture.
const MAX_PLACE_WORDS: usize = 4;

/// Surface patterns over the lowercased request.
static SURFACE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("in", r"\bin\s+([a-z][a-z .'&-]*)"),
        ("near", r"\bnear\s+([a-z][a-z .'&-]*)"),
        ("around", r"\baround\s+([a-z][a-z .'&-]*)"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("static regex")))
    .collect()
});

/// `Koramangala events`, matched on the original casing.
static NAMED_EVENTS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)*)\s+[Ee]vents?\b").expect("static regex")
});

/// Where the resolved coordinates came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// Built-in table of cities and neighborhoods.
    StaticTable,
    /// External geocoding provider.
    Geocoder,
    /// Not resolved.
    #[default]
    Unresolved,
}

impl LocationSource {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StaticTable => "static",
            Self::Geocoder => "geocoder",
            Self::Unresolved => "unresolved",
        }
    }
}

/// Value produced by the location resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationMatch {
    /// Resolved coordinates; absent when nothing resolved.
    pub coordinates: Option<Coordinates>,
    /// Display name of the resolved place.
    pub name: Option<String>,
    /// Place phrase that was looked up.
    pub query: Option<String>,
    /// Whether the phrase names a curated neighborhood.
    pub is_neighborhood: bool,
    /// Where the coordinates came from.
    pub source: LocationSource,
    /// Whether the caller's default city supplied the phrase.
    pub from_default: bool,
    /// Upstream failure or not-found message.
    pub error: Option<String>,
}

/// How a candidate phrase was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Pattern(&'static str),
    Scan,
    DefaultCity,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern(name) => write!(f, "'{name} X' pattern"),
            Self::Scan => write!(f, "known place scan"),
            Self::DefaultCity => write!(f, "default city"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    /// Lowercased, single-spaced phrase.
    phrase: String,
    origin: Origin,
}

/// Resolves place phrases to coordinates.
///
/// Borrowed collaborators only; build one per request.
pub struct LocationResolver<'a> {
    taxonomy: &'a Taxonomy,
    geocoder: Option<&'a dyn Geocoder>,
    country_bias: &'a str,
}

impl<'a> LocationResolver<'a> {
    /// Creates a resolver with no geocoder and an Indian country bias.
    #[must_use]
    pub const fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            geocoder: None,
            country_bias: "in",
        }
    }

    /// Sets the geocoder consulted for names outside the static table.
    #[must_use]
    pub fn with_geocoder(mut self, geocoder: Option<&'a dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    /// Sets the ISO country code passed to the geocoder.
    #[must_use]
    pub const fn with_country_bias(mut self, country_bias: &'a str) -> Self {
        self.country_bias = country_bias;
        self
    }

    /// Resolves the place mentioned in `text`, or `default_city`.
    ///
    /// Never fails: geocoder errors are reported through
    /// [`LocationMatch::error`] with `detected = false`.
    pub fn resolve(&self, text: &str, default_city: Option<&str>) -> Extraction<LocationMatch> {
        let Some(candidate) = self.extract_candidate(text).or_else(|| {
            default_city
                .and_then(normalize)
                .map(|phrase| Candidate {
                    phrase,
                    origin: Origin::DefaultCity,
                })
        }) else {
            record(LocationSource::Unresolved);
            return Extraction::none(0.0, "no place mentioned and no default city");
        };

        tracing::debug!(phrase = %candidate.phrase, origin = %candidate.origin, "Location candidate");
        let result = self.resolve_candidate(&candidate);
        record(result.value.source);
        result
    }

    fn extract_candidate(&self, text: &str) -> Option<Candidate> {
        let lower = text.to_lowercase();

        for (name, pattern) in SURFACE_PATTERNS.iter() {
            let found = pattern
                .captures_iter(&lower)
                .filter_map(|caps| caps.get(1))
                .filter_map(|m| clean_capture(m.as_str()))
                .find(|phrase| !self.is_topic(phrase));
            if let Some(phrase) = found {
                return Some(Candidate {
                    phrase,
                    origin: Origin::Pattern(name),
                });
            }
        }

        let named = NAMED_EVENTS_PATTERN
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| self.clean_named_capture(m.as_str()));
        if let Some(phrase) = named {
            return Some(Candidate {
                phrase,
                origin: Origin::Pattern("events"),
            });
        }

        scan_known_place(&lower).map(|(alias, _)| Candidate {
            phrase: alias.to_string(),
            origin: Origin::Scan,
        })
    }

    /// Trims a capitalised run to its place part and rejects topic words
    /// ("Jazz events", "Comedy events").
    fn clean_named_capture(&self, raw: &str) -> Option<String> {
        let words: Vec<String> = raw
            .split_whitespace()
            .map(str::to_lowercase)
            .skip_while(|w| PLACE_BOUNDARY_WORDS.contains(w.as_str()) || STOP_WORDS.contains(w.as_str()))
            .collect();
        if words.is_empty() || words.iter().any(|w| STOP_WORDS.contains(w.as_str())) {
            return None;
        }
        let phrase = words.join(" ");
        if self.is_topic(&phrase) || GENERIC_PLACES.contains(phrase.as_str()) {
            None
        } else {
            Some(phrase)
        }
    }

    /// True when `phrase` is a taxonomy name at any level ("jazz", "comedy").
    fn is_topic(&self, phrase: &str) -> bool {
        [
            TaxonomyLevel::Primary,
            TaxonomyLevel::Secondary,
            TaxonomyLevel::Interest,
        ]
        .iter()
        .any(|level| self.taxonomy.contains(*level, phrase))
    }

    fn resolve_candidate(&self, candidate: &Candidate) -> Extraction<LocationMatch> {
        let phrase = candidate.phrase.as_str();
        let is_neighborhood = names_neighborhood(phrase);
        let base = LocationMatch {
            query: Some(phrase.to_string()),
            is_neighborhood,
            from_default: candidate.origin == Origin::DefaultCity,
            ..LocationMatch::default()
        };

        if let Some(place) = places::lookup(phrase) {
            return from_static(base, place, STATIC_EXACT_CONFIDENCE, candidate);
        }

        let geocode_error = match self.geocoder {
            Some(geocoder) => match geocoder.geocode(phrase, self.country_bias) {
                Ok(Some(found)) => {
                    let confidence = found.accuracy.confidence();
                    let reasoning = format!(
                        "'{phrase}' from {} geocoded by {} ({:?})",
                        candidate.origin,
                        geocoder.name(),
                        found.accuracy
                    );
                    return Extraction::detected(
                        LocationMatch {
                            coordinates: Some(found.coordinates),
                            name: Some(found.formatted_name),
                            source: LocationSource::Geocoder,
                            ..base
                        },
                        confidence,
                        reasoning,
                    );
                },
                Ok(None) => format!("no geocoding match for '{phrase}'"),
                Err(err) => {
                    tracing::warn!(
                        provider = geocoder.name(),
                        phrase = %phrase,
                        error = %err,
                        "Geocoding failed"
                    );
                    format!("geocoding failed: {err}")
                },
            },
            None => format!("'{phrase}' is not a known place and no geocoder is configured"),
        };

        if let Some((_, place)) = scan_known_place(phrase) {
            return from_static(base, place, STATIC_CONTAINED_CONFIDENCE, candidate);
        }

        let reasoning = geocode_error.clone();
        Extraction::fallback(
            LocationMatch {
                error: Some(geocode_error),
                ..base
            },
            0.1,
            reasoning,
        )
    }
}

fn from_static(
    base: LocationMatch,
    place: &Place,
    confidence: f32,
    candidate: &Candidate,
) -> Extraction<LocationMatch> {
    let reasoning = format!(
        "'{}' from {} found in static table",
        candidate.phrase, candidate.origin
    );
    Extraction::detected(
        LocationMatch {
            coordinates: Some(place.coordinates),
            name: Some(place.display.to_string()),
            is_neighborhood: base.is_neighborhood || place.kind == PlaceKind::Neighborhood,
            source: LocationSource::StaticTable,
            ..base
        },
        confidence,
        reasoning,
    )
}

fn record(source: LocationSource) {
    metrics::counter!("location_resolution_total", "source" => source.as_str()).increment(1);
}

/// Lowercases, trims punctuation and collapses whitespace.
fn normalize(raw: &str) -> Option<String> {
    let words: Vec<String> = raw
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// Cuts a pattern capture at the first boundary word.
fn clean_capture(raw: &str) -> Option<String> {
    let mut words = Vec::new();
    for word in raw
        .split_whitespace()
        .skip_while(|w| matches!(*w, "the" | "a" | "an"))
    {
        let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
        if trimmed.is_empty() || PLACE_BOUNDARY_WORDS.contains(trimmed) {
            break;
        }
        words.push(trimmed);
        if words.len() == MAX_PLACE_WORDS || word.ends_with(['.', '!']) {
            break;
        }
    }
    let phrase = words.join(" ");
    if phrase.is_empty() || GENERIC_PLACES.contains(phrase.as_str()) {
        None
    } else {
        Some(phrase)
    }
}

/// Longest known place named in `lower`, earliest on ties.
fn scan_known_place(lower: &str) -> Option<(&'static str, &'static Place)> {
    places::aliases()
        .filter_map(|(alias, place)| find_word(lower, alias).map(|pos| (pos, alias, place)))
        .min_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)))
        .map(|(_, alias, place)| (alias, place))
}

fn names_neighborhood(phrase: &str) -> bool {
    places::PLACES
        .iter()
        .filter(|p| p.kind == PlaceKind::Neighborhood)
        .flat_map(|p| p.aliases.iter())
        .any(|alias| find_word(phrase, alias).is_some())
}
