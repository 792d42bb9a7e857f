//! Configuration management.
//!
//! Configuration is read from `config.toml` in the platform config directory
//! (or `~/.config/eventsense/`), then overridden by `EVENTSENSE_*` environment
//! variables. Secret fields accept `${VAR}` references.
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `EVENTSENSE_DEFAULT_CITY` | `query.default_city` |
//! | `EVENTSENSE_DEFAULT_LIMIT` | `query.default_limit` |
//! | `EVENTSENSE_COUNTRY_BIAS` | `query.country_bias` |
//! | `EVENTSENSE_OVERFETCH_FACTOR` | `retrieval.overfetch_factor` |
//! | `EVENTSENSE_CATALOG_URL` | `catalog.base_url` |
//! | `EVENTSENSE_CATALOG_API_KEY` | `catalog.api_key` |
//! | `EVENTSENSE_GEOCODER_API_KEY` | `geocoder.api_key` |
//! | `EVENTSENSE_LLM_PROVIDER` | `llm.provider` |
//! | `EVENTSENSE_LLM_MODEL` | `llm.model` |
//! | `EVENTSENSE_LLM_API_KEY` | `llm.api_key` |
//! | `EVENTSENSE_TRACKING_BASE_URL` | `tracking.base_url` |
//! | `EVENTSENSE_TAXONOMY_PATH` | `taxonomy_path` |

use crate::catalog::{EventCatalog, HttpEventCatalog, TrackedLinkBuilder};
use crate::geocoding::{Geocoder, GoogleGeocoder};
use crate::http::HttpConfig;
use crate::llm::{AnthropicClient, LlmProvider, OpenAiClient};
use crate::models::{Coordinates, MAX_LIMIT, MIN_LIMIT};
use crate::services::{EventRetrievalService, QueryAssembler, QueryDefaults, RetrievalConfig};
use crate::taxonomy::Taxonomy;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main configuration for eventsense.
#[derive(Debug, Clone, Default)]
pub struct EventSenseConfig {
    /// Defaults for query assembly.
    pub query: QueryDefaults,
    /// Retrieval tuning.
    pub retrieval: RetrievalConfig,
    /// Event catalog endpoint.
    pub catalog: CatalogConfig,
    /// Geocoding provider.
    pub geocoder: GeocoderConfig,
    /// LLM used as the last tag stage.
    pub llm: LlmConfig,
    /// Outbound link parameters.
    pub tracking: TrackingConfig,
    /// Custom taxonomy JSON; the built-in vocabulary when absent.
    pub taxonomy_path: Option<PathBuf>,
}

/// Event catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL.
    pub base_url: Option<String>,
    /// API key.
    pub api_key: Option<SecretString>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_ms: 10_000,
        }
    }
}

/// Geocoder configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// API key; the geocoder is disabled without one.
    pub api_key: Option<SecretString>,
    /// Endpoint override.
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            timeout_ms: 5_000,
        }
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Selected backend.
    pub provider: LlmBackend,
    /// Model name; the provider default when absent.
    pub model: Option<String>,
    /// API key; the provider's own environment variable when absent.
    pub api_key: Option<SecretString>,
    /// Base URL for proxies and compatible endpoints.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmBackend::None,
            model: None,
            api_key: None,
            base_url: None,
            timeout_ms: 15_000,
        }
    }
}

/// Available LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    /// `OpenAI` chat completions.
    OpenAi,
    /// Anthropic messages.
    Anthropic,
    /// No model-based tag stage.
    #[default]
    None,
}

impl LlmBackend {
    /// Parses a provider string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open_ai" => Some(Self::OpenAi),
            "anthropic" | "claude" => Some(Self::Anthropic),
            "none" | "off" | "" => Some(Self::None),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::None => "none",
        }
    }
}

/// Outbound link configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingConfig {
    /// Site that event links point to; the catalog base URL when absent.
    pub base_url: Option<String>,
    /// `utm_source` parameter.
    pub utm_source: String,
    /// `utm_medium` parameter.
    pub utm_medium: String,
    /// `utm_campaign` parameter.
    pub utm_campaign: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            utm_source: "eventsense".to_string(),
            utm_medium: "social".to_string(),
            utm_campaign: "event_discovery".to_string(),
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// `[query]` section.
    pub query: Option<ConfigFileQuery>,
    /// `[retrieval]` section.
    pub retrieval: Option<ConfigFileRetrieval>,
    /// `[catalog]` section.
    pub catalog: Option<ConfigFileCatalog>,
    /// `[geocoder]` section.
    pub geocoder: Option<ConfigFileGeocoder>,
    /// `[llm]` section.
    pub llm: Option<ConfigFileLlm>,
    /// `[tracking]` section.
    pub tracking: Option<ConfigFileTracking>,
    /// Custom taxonomy JSON path.
    pub taxonomy_path: Option<String>,
}

/// `[query]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileQuery {
    /// City used when the request names none.
    pub default_city: Option<String>,
    /// Result count when the request names none.
    pub default_limit: Option<usize>,
    /// Country code passed to the geocoder.
    pub country_bias: Option<String>,
}

/// `[retrieval]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileRetrieval {
    /// Multiplier on the limit when filtering locally.
    pub overfetch_factor: Option<usize>,
    /// Smallest over-fetched page.
    pub min_overfetch: Option<usize>,
    /// City searched when nothing resolved.
    pub fallback_city: Option<String>,
    /// Fallback centre latitude.
    pub fallback_latitude: Option<f64>,
    /// Fallback centre longitude.
    pub fallback_longitude: Option<f64>,
}

/// `[catalog]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileCatalog {
    /// Base URL.
    pub base_url: Option<String>,
    /// Supports `${VAR}` expansion.
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// `[geocoder]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileGeocoder {
    /// Supports `${VAR}` expansion.
    pub api_key: Option<String>,
    /// Endpoint override.
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// `[llm]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLlm {
    /// `openai`, `anthropic` or `none`.
    pub provider: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Supports `${VAR}` expansion.
    pub api_key: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// `[tracking]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTracking {
    /// Base URL.
    pub base_url: Option<String>,
    /// `utm_source` parameter.
    pub utm_source: Option<String>,
    /// `utm_medium` parameter.
    pub utm_medium: Option<String>,
    /// `utm_campaign` parameter.
    pub utm_campaign: Option<String>,
}

impl EventSenseConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds
    /// invalid values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::operation("read_config_file", format!("{}: {e}", path.display())))?;
        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| Error::operation("parse_config_file", format!("{}: {e}", path.display())))?;
        Self::from_config_file(file, |key| std::env::var(key).ok())
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir, then `~/.config/eventsense/`. Returns
    /// defaults if no readable config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        for path in Self::default_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                },
            }
        }
        Self::default()
    }

    /// Loads `path` if given, otherwise the default location, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides())
    }

    fn default_paths() -> Vec<PathBuf> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Vec::new();
        };
        let platform = base_dirs.config_dir().join("eventsense").join("config.toml");
        let xdg = base_dirs
            .home_dir()
            .join(".config")
            .join("eventsense")
            .join("config.toml");
        if platform == xdg {
            vec![platform]
        } else {
            vec![platform, xdg]
        }
    }

    /// Converts a parsed file, expanding `${VAR}` in secrets through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown LLM provider or invalid
    /// fallback coordinates.
    pub fn from_config_file<F>(file: ConfigFile, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(query) = file.query {
            if query.default_city.is_some() {
                config.query.default_city = query.default_city;
            }
            if let Some(limit) = query.default_limit {
                config.query.default_limit = limit.clamp(MIN_LIMIT, MAX_LIMIT);
            }
            if let Some(bias) = query.country_bias {
                config.query.country_bias = bias;
            }
        }

        if let Some(retrieval) = file.retrieval {
            if let Some(factor) = retrieval.overfetch_factor {
                config.retrieval.overfetch_factor = factor.max(1);
            }
            if let Some(min) = retrieval.min_overfetch {
                config.retrieval.min_overfetch = min;
            }
            if let Some(city) = retrieval.fallback_city {
                config.retrieval.fallback_city = city;
            }
            if let (Some(lat), Some(lon)) = (retrieval.fallback_latitude, retrieval.fallback_longitude)
            {
                let center = Coordinates::new(lat, lon);
                if !center.is_valid() {
                    return Err(Error::InvalidInput(format!(
                        "retrieval fallback coordinates out of range: {lat}, {lon}"
                    )));
                }
                config.retrieval.fallback_center = center;
            }
        }

        if let Some(catalog) = file.catalog {
            config.catalog.base_url = catalog.base_url;
            config.catalog.api_key = catalog.api_key.and_then(|raw| secret(&raw, &lookup));
            if let Some(timeout) = catalog.timeout_ms {
                config.catalog.timeout_ms = timeout;
            }
        }

        if let Some(geocoder) = file.geocoder {
            config.geocoder.api_key = geocoder.api_key.and_then(|raw| secret(&raw, &lookup));
            config.geocoder.endpoint = geocoder.endpoint;
            if let Some(timeout) = geocoder.timeout_ms {
                config.geocoder.timeout_ms = timeout;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                config.llm.provider = LlmBackend::parse(&provider).ok_or_else(|| {
                    Error::InvalidInput(format!("unknown llm provider '{provider}'"))
                })?;
            }
            config.llm.model = llm.model;
            config.llm.api_key = llm.api_key.and_then(|raw| secret(&raw, &lookup));
            config.llm.base_url = llm.base_url;
            if let Some(timeout) = llm.timeout_ms {
                config.llm.timeout_ms = timeout;
            }
        }

        if let Some(tracking) = file.tracking {
            config.tracking.base_url = tracking.base_url;
            if let Some(source) = tracking.utm_source {
                config.tracking.utm_source = source;
            }
            if let Some(medium) = tracking.utm_medium {
                config.tracking.utm_medium = medium;
            }
            if let Some(campaign) = tracking.utm_campaign {
                config.tracking.utm_campaign = campaign;
            }
        }

        config.taxonomy_path = file.taxonomy_path.map(PathBuf::from);
        Ok(config)
    }

    /// Applies `EVENTSENSE_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_env_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn with_env_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(city) = get("EVENTSENSE_DEFAULT_CITY") {
            self.query.default_city = Some(city);
        }
        if let Some(v) = get("EVENTSENSE_DEFAULT_LIMIT") {
            match v.trim().parse::<usize>() {
                Ok(limit) => self.query.default_limit = limit.clamp(MIN_LIMIT, MAX_LIMIT),
                Err(_) => invalid_override("EVENTSENSE_DEFAULT_LIMIT", &v),
            }
        }
        if let Some(bias) = get("EVENTSENSE_COUNTRY_BIAS") {
            self.query.country_bias = bias;
        }
        if let Some(v) = get("EVENTSENSE_OVERFETCH_FACTOR") {
            match v.trim().parse::<usize>() {
                Ok(factor) => self.retrieval.overfetch_factor = factor.max(1),
                Err(_) => invalid_override("EVENTSENSE_OVERFETCH_FACTOR", &v),
            }
        }
        if let Some(url) = get("EVENTSENSE_CATALOG_URL") {
            self.catalog.base_url = Some(url);
        }
        if let Some(key) = get("EVENTSENSE_CATALOG_API_KEY") {
            self.catalog.api_key = Some(SecretString::from(key));
        }
        if let Some(key) = get("EVENTSENSE_GEOCODER_API_KEY") {
            self.geocoder.api_key = Some(SecretString::from(key));
        }
        if let Some(v) = get("EVENTSENSE_LLM_PROVIDER") {
            match LlmBackend::parse(&v) {
                Some(provider) => self.llm.provider = provider,
                None => invalid_override("EVENTSENSE_LLM_PROVIDER", &v),
            }
        }
        if let Some(model) = get("EVENTSENSE_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(key) = get("EVENTSENSE_LLM_API_KEY") {
            self.llm.api_key = Some(SecretString::from(key));
        }
        if let Some(url) = get("EVENTSENSE_TRACKING_BASE_URL") {
            self.tracking.base_url = Some(url);
        }
        if let Some(path) = get("EVENTSENSE_TAXONOMY_PATH") {
            self.taxonomy_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Loads the configured taxonomy, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom taxonomy file cannot be read or is invalid.
    pub fn taxonomy(&self) -> Result<Arc<Taxonomy>> {
        match &self.taxonomy_path {
            Some(path) => Taxonomy::load_from_file(path).map(Arc::new),
            None => Ok(Arc::new(Taxonomy::builtin().clone())),
        }
    }

    /// Builds the geocoder, if an API key is configured.
    #[must_use]
    pub fn geocoder(&self) -> Option<Arc<dyn Geocoder>> {
        let key = self.geocoder.api_key.as_ref()?;
        let mut geocoder = GoogleGeocoder::new()
            .with_api_key(key.expose_secret())
            .with_http_config(HttpConfig::with_timeout_ms(self.geocoder.timeout_ms));
        if let Some(endpoint) = &self.geocoder.endpoint {
            geocoder = geocoder.with_endpoint(endpoint);
        }
        Some(Arc::new(geocoder))
    }

    /// Builds the LLM client for the configured backend.
    #[must_use]
    pub fn llm_provider(&self) -> Option<Arc<dyn LlmProvider>> {
        let http = HttpConfig::with_timeout_ms(self.llm.timeout_ms);
        let llm = &self.llm;
        match llm.provider {
            LlmBackend::None => None,
            LlmBackend::OpenAi => {
                let mut client = OpenAiClient::new().with_http_config(http);
                if let Some(key) = &llm.api_key {
                    client = client.with_api_key(key.expose_secret());
                }
                if let Some(model) = &llm.model {
                    client = client.with_model(model);
                }
                if let Some(url) = &llm.base_url {
                    client = client.with_endpoint(url);
                }
                Some(Arc::new(client))
            },
            LlmBackend::Anthropic => {
                let mut client = AnthropicClient::new().with_http_config(http);
                if let Some(key) = &llm.api_key {
                    client = client.with_api_key(key.expose_secret());
                }
                if let Some(model) = &llm.model {
                    client = client.with_model(model);
                }
                if let Some(url) = &llm.base_url {
                    client = client.with_endpoint(url);
                }
                Some(Arc::new(client))
            },
        }
    }

    /// Builds the event catalog client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] if no catalog base URL is set.
    pub fn catalog(&self) -> Result<Arc<dyn EventCatalog>> {
        let base_url = self
            .catalog
            .base_url
            .as_deref()
            .ok_or_else(|| Error::NotConfigured("catalog.base_url".to_string()))?;
        let mut catalog = HttpEventCatalog::new(base_url)
            .with_http_config(HttpConfig::with_timeout_ms(self.catalog.timeout_ms));
        if let Some(key) = &self.catalog.api_key {
            catalog = catalog.with_api_key(key.expose_secret());
        }
        Ok(Arc::new(catalog))
    }

    /// Builds the outbound link builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] if neither a tracking nor a catalog
    /// base URL is set, or [`Error::InvalidInput`] if the URL is invalid.
    pub fn link_builder(&self) -> Result<TrackedLinkBuilder> {
        let base_url = self
            .tracking
            .base_url
            .as_deref()
            .or(self.catalog.base_url.as_deref())
            .ok_or_else(|| Error::NotConfigured("tracking.base_url".to_string()))?;
        TrackedLinkBuilder::new(
            base_url,
            self.tracking.utm_source.as_str(),
            self.tracking.utm_medium.as_str(),
            self.tracking.utm_campaign.as_str(),
        )
    }

    /// Builds a query assembler from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom taxonomy cannot be loaded.
    pub fn assembler(&self) -> Result<QueryAssembler> {
        Ok(QueryAssembler::builder()
            .taxonomy(self.taxonomy()?)
            .geocoder(self.geocoder())
            .llm(self.llm_provider())
            .defaults(self.query.clone())
            .build())
    }

    /// Builds a retrieval service from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or tracking base URL is missing or invalid.
    pub fn retrieval_service(&self) -> Result<EventRetrievalService> {
        Ok(
            EventRetrievalService::new(self.catalog()?, self.link_builder()?)
                .with_config(self.retrieval.clone()),
        )
    }
}

fn invalid_override(key: &str, value: &str) {
    tracing::warn!(key, value, "Ignoring invalid environment override");
}

/// Wraps a config value as a secret after `${VAR}` expansion; empty results
/// are treated as unset.
fn secret<F>(raw: &str, lookup: &F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = expand_env_vars(raw, lookup);
    let trimmed = expanded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(SecretString::from(trimmed.to_string()))
    }
}

/// Replaces `${VAR}` references with values from `lookup`.
///
/// Unknown variables expand to the empty string; an unterminated `${` is kept
/// verbatim.
pub fn expand_env_vars<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        if let Some(v) = lookup(&after[..end]) {
            out.push_str(&v);
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
