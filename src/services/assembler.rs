//! Query assembly: free text in, [`SearchSpec`] out.
//!
//! The five resolvers are independent. Tags (which may call the LLM) run on a
//! scoped thread while location (which may call the geocoder) and the
//! pure-regex resolvers run inline on the caller's thread. Radius is derived
//! from the location result.

use super::retrieval::SearchOptions;
use crate::geocoding::Geocoder;
use crate::llm::LlmProvider;
use crate::models::{Budget, Extraction, SearchSpec, TimeFilter};
use crate::resolvers::{
    DEFAULT_LIMIT, LocationMatch, LocationResolver, RadiusMatch, TagMatch, TagResolver,
    resolve_budget, resolve_limit, resolve_radius, resolve_time_at,
};
use crate::taxonomy::Taxonomy;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Defaults applied when the request is silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDefaults {
    /// City used when the text names no place.
    pub default_city: Option<String>,
    /// Result count when the text names none.
    pub default_limit: usize,
    /// ISO country code passed to the geocoder.
    pub country_bias: String,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            default_city: None,
            default_limit: DEFAULT_LIMIT,
            country_bias: "in".to_string(),
        }
    }
}

/// An assembled spec with every resolver's extraction, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledQuery {
    /// The original request.
    pub text: String,
    /// The merged spec.
    pub spec: SearchSpec,
    /// Location extraction.
    pub location: Extraction<LocationMatch>,
    /// Tag extraction.
    pub tags: Extraction<TagMatch>,
    /// Radius extraction.
    pub radius: Extraction<RadiusMatch>,
    /// Time window extraction.
    pub time: Extraction<Option<TimeFilter>>,
    /// Price extraction.
    pub budget: Extraction<Budget>,
    /// Result count extraction.
    pub limit: Extraction<usize>,
}

impl AssembledQuery {
    /// Retrieval options carrying the request text for relevance ranking.
    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            query_text: Some(self.text.clone()),
            coordinates: None,
        }
    }
}

/// Runs the resolvers and joins their output.
pub struct QueryAssembler {
    taxonomy: Arc<Taxonomy>,
    geocoder: Option<Arc<dyn Geocoder>>,
    llm: Option<Arc<dyn LlmProvider>>,
    defaults: QueryDefaults,
}

impl QueryAssembler {
    /// Starts building an assembler.
    #[must_use]
    pub fn builder() -> QueryAssemblerBuilder {
        QueryAssemblerBuilder::default()
    }

    /// The vocabulary tags are drawn from.
    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Assembles a spec for `text` as of today.
    #[must_use]
    pub fn assemble(&self, text: &str) -> AssembledQuery {
        self.assemble_at(text, None, Local::now().date_naive())
    }

    /// Assembles a spec with optional conversational context for the tag
    /// resolver, resolving relative dates against `today`.
    #[must_use]
    pub fn assemble_at(&self, text: &str, context: Option<&str>, today: NaiveDate) -> AssembledQuery {
        let start = Instant::now();

        let (location, tags) = std::thread::scope(|s| {
            let tags = s.spawn(|| {
                TagResolver::new(&self.taxonomy)
                    .with_llm(self.llm.as_deref())
                    .resolve(text, context)
            });
            let location = LocationResolver::new(&self.taxonomy)
                .with_geocoder(self.geocoder.as_deref())
                .with_country_bias(&self.defaults.country_bias)
                .resolve(text, self.defaults.default_city.as_deref());
            let tags = tags.join().unwrap_or_else(|_| {
                tracing::error!("Tag resolver panicked");
                Extraction::none(0.3, "tag resolver failed")
            });
            (location, tags)
        });

        let radius = resolve_radius(
            text,
            location.value.name.as_deref(),
            location.value.is_neighborhood,
        );
        let time = resolve_time_at(text, today);
        let budget = resolve_budget(text);
        let limit = resolve_limit(text, self.defaults.default_limit);

        let spec = SearchSpec::builder()
            .coordinates(location.value.coordinates)
            .location_name(location.value.name.clone())
            .tags(tags.value.all_tags())
            .radius_km(radius.value.radius_km)
            .time(time.value.clone())
            .budget(budget.value)
            .limit(limit.value)
            .build();

        tracing::info!(
            location = spec.location_name().unwrap_or("-"),
            tags = spec.tags().len(),
            tag_source = %tags.value.source,
            radius_km = spec.radius_km(),
            time = spec.time().map_or("-", |t| t.value.as_str()),
            budget = %spec.budget().class,
            limit = spec.limit(),
            duration_ms = start.elapsed().as_millis(),
            "Assembled search spec"
        );

        AssembledQuery {
            text: text.to_string(),
            spec,
            location,
            tags,
            radius,
            time,
            budget,
            limit,
        }
    }
}

/// Builder for [`QueryAssembler`].
#[derive(Default)]
pub struct QueryAssemblerBuilder {
    taxonomy: Option<Arc<Taxonomy>>,
    geocoder: Option<Arc<dyn Geocoder>>,
    llm: Option<Arc<dyn LlmProvider>>,
    defaults: QueryDefaults,
}

impl QueryAssemblerBuilder {
    /// Uses a custom vocabulary instead of the built-in one.
    #[must_use]
    pub fn taxonomy(mut self, taxonomy: Arc<Taxonomy>) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    /// Sets the geocoder for places outside the static table.
    #[must_use]
    pub fn geocoder(mut self, geocoder: Option<Arc<dyn Geocoder>>) -> Self {
        self.geocoder = geocoder;
        self
    }

    /// Sets the LLM used as the last tag stage.
    #[must_use]
    pub fn llm(mut self, llm: Option<Arc<dyn LlmProvider>>) -> Self {
        self.llm = llm;
        self
    }

    /// Sets the query defaults.
    #[must_use]
    pub fn defaults(mut self, defaults: QueryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builds the assembler.
    #[must_use]
    pub fn build(self) -> QueryAssembler {
        QueryAssembler {
            taxonomy: self
                .taxonomy
                .unwrap_or_else(|| Arc::new(Taxonomy::builtin().clone())),
            geocoder: self.geocoder,
            llm: self.llm,
            defaults: self.defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::{GeocodeAccuracy, GeocodeMatch};
    use crate::models::{BudgetClass, Coordinates, TimeMode};
    use crate::resolvers::{LocationSource, LocationType};
    use crate::{Error, Result};

    struct DownGeocoder;

    impl Geocoder for DownGeocoder {
        fn name(&self) -> &'static str {
            "down"
        }

        fn geocode(&self, _address: &str, _country_bias: &str) -> Result<Option<GeocodeMatch>> {
            Err(Error::operation("geocode", "service unavailable"))
        }
    }

    struct PointGeocoder;

    impl Geocoder for PointGeocoder {
        fn name(&self) -> &'static str {
            "point"
        }

        fn geocode(&self, address: &str, _country_bias: &str) -> Result<Option<GeocodeMatch>> {
            Ok(Some(GeocodeMatch {
                coordinates: Coordinates::new(11.94, 79.83),
                formatted_name: format!("{address}, India"),
                accuracy: GeocodeAccuracy::GeometricCenter,
            }))
        }
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    #[test]
    fn test_end_to_end_free_jazz() {
        let assembler = QueryAssembler::builder().build();
        let query = assembler.assemble_at(
            "free jazz night this weekend near Koramangala, just one pick",
            None,
            wednesday(),
        );
        let spec = &query.spec;

        assert!(spec.tags().contains("Music"));
        assert!(spec.tags().contains("Jazz/Blues"));
        assert!((spec.radius_km() - 5.0).abs() < f64::EPSILON);
        assert_eq!(query.radius.value.location_type, LocationType::Neighborhood);

        let time = spec.time().unwrap();
        assert_eq!(time.mode, TimeMode::Range);
        assert_eq!(time.start, NaiveDate::from_ymd_opt(2026, 3, 7).unwrap());
        assert_eq!(time.end, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());

        assert_eq!(spec.budget().class, BudgetClass::Free);
        assert_eq!(spec.budget().max_price, Some(0.0));
        assert_eq!(spec.limit(), 1);
        assert!(spec.coordinates().is_some());
    }

    #[test]
    fn test_geocoder_outage_does_not_abort() {
        let assembler = QueryAssembler::builder()
            .geocoder(Some(Arc::new(DownGeocoder)))
            .build();
        let query = assembler.assemble_at("comedy in Atlantis under 300", None, wednesday());

        assert!(!query.location.detected);
        assert!(query.location.value.error.is_some());
        assert!(query.spec.coordinates().is_none());
        assert!(query.spec.tags().contains("Comedy"));
        assert_eq!(query.spec.budget().max_price, Some(300.0));
        assert!((query.spec.radius_km() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_geocoded_location() {
        let assembler = QueryAssembler::builder()
            .geocoder(Some(Arc::new(PointGeocoder)))
            .build();
        let query = assembler.assemble_at("pottery workshops in Pondicherry", None, wednesday());
        assert_eq!(query.location.value.source, LocationSource::Geocoder);
        assert_eq!(query.spec.coordinates(), Some(Coordinates::new(11.94, 79.83)));
    }

    #[test]
    fn test_defaults_apply() {
        let assembler = QueryAssembler::builder()
            .defaults(QueryDefaults {
                default_city: Some("Mumbai".to_string()),
                default_limit: 5,
                ..QueryDefaults::default()
            })
            .build();
        let query = assembler.assemble_at("something fun", None, wednesday());
        assert!(query.location.value.from_default);
        assert_eq!(query.spec.limit(), 5);
        assert!(query.spec.time().is_none());
        assert_eq!(query.spec.budget().class, BudgetClass::Any);
    }

    #[test]
    fn test_search_options_carry_text() {
        let query = QueryAssembler::builder()
            .build()
            .assemble_at("jazz", None, wednesday());
        assert_eq!(query.search_options().query_text.as_deref(), Some("jazz"));
    }
}
