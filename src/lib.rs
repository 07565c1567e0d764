//! Quarry - Hybrid Retrieval Engine
//!
//! Turns a natural-language query into a ranked, diversified list of
//! supporting passages: the query is embedded, a fused lexical/vector
//! search runs against an external index service, scores are normalized
//! and snippets extracted, and the candidate pool is re-ranked for topical
//! diversity with Maximal Marginal Relevance.

pub mod config;
pub mod document;
pub mod error;
pub mod provider;
pub mod retrieval;

pub use error::{QuarryError, Result};
