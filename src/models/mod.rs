//! Data models.
//!
//! - [`Extraction`]: per-resolver result envelope
//! - [`SearchSpec`]: merged resolver output handed to retrieval
//! - [`CatalogEvent`] / [`RankedEvent`]: catalog records and decorated results

mod event;
mod extraction;
mod geo;
mod spec;

pub use event::{CatalogEvent, RankedEvent, SearchOutcome};
pub use extraction::{Extraction, clamp_confidence};
pub use geo::Coordinates;
pub use spec::{
    Budget, BudgetClass, DATE_FORMAT, DEFAULT_RADIUS_KM, MAX_LIMIT, MIN_LIMIT, SearchSpec,
    SearchSpecBuilder, SortMode, TimeFilter, TimeMode,
};
