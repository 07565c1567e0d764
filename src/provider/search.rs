//! Search index provider interface

use crate::document::RawSearchResult;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchProviderError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Malformed index response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Trait for the combined text+vector search index
///
/// A single underlying query combines term-match scoring and
/// vector-similarity scoring into one fused relevance score per hit.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Run a fused lexical/vector query against `index`.
    ///
    /// Returns up to `size` hits, pre-sorted descending by fused score.
    async fn hybrid_search(
        &self,
        index: &str,
        query: &str,
        query_vector: &[f32],
        size: usize,
    ) -> Result<RawSearchResult, SearchProviderError>;
}
