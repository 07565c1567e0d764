//! Embedding provider interface

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Trait for embedding providers
///
/// Allows abstraction over different embedding backends (hosted APIs,
/// local models). A pure function of text: one vector per input text, in
/// input order, with fixed dimensionality per deployment.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
