//! Free-text resolvers.
//!
//! Each resolver extracts one attribute of a [`SearchSpec`](crate::SearchSpec)
//! from the raw request and reports it as an [`Extraction`](crate::Extraction).
//! Resolvers are stateless, share no mutable data and never fail: "nothing
//! detected" is an ordinary outcome carrying the resolver default.
//!
//! # Resolvers
//!
//! | Resolver | Output | Default |
//! |----------|--------|---------|
//! | [`location`] | coordinates, display name, neighborhood flag | unresolved |
//! | [`tags`] | primary / secondary / interest names | empty (all categories) |
//! | [`radius`] | radius in km + location class | 20 km |
//! | [`temporal`] | keyword / date / range window | no time constraint |
//! | [`budget`] | price class + ceiling | any |
//! | [`limit`] | result count in `[1, 20]` | 3 |
//!
//! Only the location resolver (geocoder) and the tag resolver (model
//! fallback) can touch the network; everything else is pure pattern matching.

pub mod budget;
pub mod limit;
pub mod location;
mod patterns;
pub mod radius;
pub mod tags;
pub mod temporal;

pub use budget::resolve_budget;
pub use limit::{DEFAULT_LIMIT, resolve_limit};
pub use location::{LocationMatch, LocationResolver, LocationSource};
pub use radius::{LocationType, RadiusMatch, resolve_radius};
pub use tags::{TagMatch, TagResolver, TagSource};
pub use temporal::{resolve_time, resolve_time_at};
