use crate::config::ConfigError;
use crate::provider::{EmbeddingError, SearchProviderError};
use thiserror::Error;

/// Main error type for Quarry operations
#[derive(Error, Debug)]
pub enum QuarryError {
    /// Query text was empty after trimming whitespace
    #[error("query must not be empty")]
    EmptyQuery,

    /// Requested result count was zero
    #[error("result count must be positive")]
    InvalidResultCount,

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Embedding provider failure; fatal to the call, no lexical-only fallback
    #[error("failed to embed query: {source}")]
    Embedding {
        #[source]
        source: EmbeddingError,
    },

    /// Search index provider failure
    #[error("failed to execute search: {source}")]
    Search {
        #[source]
        source: SearchProviderError,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;
