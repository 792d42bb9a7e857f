//! Business logic services.
//!
//! [`QueryAssembler`] turns free text into a [`crate::SearchSpec`];
//! [`EventRetrievalService`] turns a spec into ranked events.

mod assembler;
pub mod ranking;
mod retrieval;

pub use assembler::{AssembledQuery, QueryAssembler, QueryAssemblerBuilder, QueryDefaults};
pub use retrieval::{EventRetrievalService, RetrievalConfig, SearchOptions};
