//! # Eventsense
//!
//! Natural-language event search.
//!
//! Eventsense turns an unstructured request such as
//! "free jazz night this weekend near Koramangala" into a structured
//! [`SearchSpec`] (centre + radius, taxonomy tags, time window, price ceiling,
//! result count), then queries an external event catalog and filters and ranks
//! the candidates locally.
//!
//! ## Pipeline
//!
//! ```text
//! free text ─┬─► location ──► radius ─┐
//!            ├─► tags (cascade) ──────┤
//!            ├─► temporal ────────────┼─► QueryAssembler ─► SearchSpec
//!            ├─► budget ──────────────┤
//!            └─► limit ───────────────┘
//!
//! SearchSpec ─► EventCatalog (over-fetch) ─► tag/price filter ─► relevance rank ─► truncate
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use eventsense::{EventRetrievalService, QueryAssembler};
//!
//! let assembler = QueryAssembler::builder().build();
//! let query = assembler.assemble("free jazz night this weekend near Koramangala");
//! let outcome = retrieval.search(&query.spec, &query.search_options());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod catalog;
pub mod config;
pub mod geocoding;
pub mod http;
pub mod llm;
pub mod models;
pub mod observability;
pub mod resolvers;
pub mod services;
pub mod taxonomy;

// Re-exports for convenience
pub use catalog::{EventCatalog, HttpEventCatalog, TrackedLinkBuilder};
pub use config::EventSenseConfig;
pub use geocoding::{Geocoder, GoogleGeocoder};
pub use llm::LlmProvider;
pub use models::{
    Budget, BudgetClass, CatalogEvent, Coordinates, Extraction, RankedEvent, SearchOutcome,
    SearchSpec, SortMode, TimeFilter, TimeMode,
};
pub use services::{AssembledQuery, EventRetrievalService, QueryAssembler, SearchOptions};
pub use taxonomy::Taxonomy;

/// Error type for eventsense operations.
///
/// Resolvers never produce errors; these variants come from the I/O seams
/// (geocoder, catalog, LLM) and from configuration loading.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed taxonomy file, invalid configuration values |
/// | `OperationFailed` | HTTP failures, non-success status codes, unparseable responses |
/// | `NotConfigured` | A client is used without a required endpoint or API key |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Geocoding, catalog or LLM requests fail at the network level
    /// - An upstream service answers with a non-success status
    /// - A response body cannot be decoded
    /// - Configuration or taxonomy files cannot be read
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A required collaborator or credential is missing.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl Error {
    /// Shorthand for [`Error::OperationFailed`].
    pub fn operation(operation: impl Into<String>, cause: impl ToString) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for eventsense operations.
pub type Result<T> = std::result::Result<T, Error>;
