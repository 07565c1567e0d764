//! Retriever facade orchestrating the hybrid search pipeline

use crate::config::RetrievalConfig;
use crate::document::ScoredResult;
use crate::error::{QuarryError, Result};
use crate::provider::{EmbeddingError, EmbeddingProvider, SearchIndexProvider};
use crate::retrieval::{apply_mmr, normalize_hits};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Hybrid retriever fusing lexical and vector relevance with
/// diversity-aware reranking
///
/// Stateless across calls apart from its tunable configuration. A shared
/// instance is safe to use from concurrent callers: each search snapshots
/// the configuration once at call start, and the setters take the write
/// side of the guard.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    search_index: Arc<dyn SearchIndexProvider>,
    config: RwLock<RetrievalConfig>,
}

impl Retriever {
    /// Create a retriever with default configuration
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        search_index: Arc<dyn SearchIndexProvider>,
    ) -> Self {
        Self::with_config(embedder, search_index, RetrievalConfig::default())
    }

    /// Create a retriever with an explicit configuration
    pub fn with_config(
        embedder: Arc<dyn EmbeddingProvider>,
        search_index: Arc<dyn SearchIndexProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            search_index,
            config: RwLock::new(config),
        }
    }

    /// Current configuration snapshot
    pub fn config(&self) -> RetrievalConfig {
        self.config.read().unwrap().clone()
    }

    /// Set the fusion weights; renormalized to sum to 1
    pub fn set_weights(&self, lexical: f32, vector: f32) -> Result<()> {
        self.config.write().unwrap().set_weights(lexical, vector)?;
        Ok(())
    }

    /// Set the MMR relevance/diversity trade-off; must lie in [0, 1]
    pub fn set_diversity_lambda(&self, lambda: f32) -> Result<()> {
        self.config.write().unwrap().set_diversity_lambda(lambda)?;
        Ok(())
    }

    /// Set the snippet window length in characters; must be positive
    pub fn set_max_snippet_length(&self, length: usize) -> Result<()> {
        self.config
            .write()
            .unwrap()
            .set_max_snippet_length(length)?;
        Ok(())
    }

    /// Execute a hybrid search against `index`, returning the top `k`
    /// results in selection order.
    ///
    /// The query is embedded, a candidate pool larger than `k` is fetched
    /// from the index in one fused lexical/vector query, candidate scores
    /// are normalized and snippets extracted, and the final `k` are
    /// selected with Maximal Marginal Relevance.
    ///
    /// All-or-nothing: any provider failure fails the whole call, and
    /// dropping the returned future abandons the in-flight provider call.
    /// There is no lexical-only fallback when embedding fails; callers
    /// needing graceful degradation implement it above this component.
    pub async fn hybrid_search(
        &self,
        index: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QuarryError::EmptyQuery);
        }
        if k == 0 {
            return Err(QuarryError::InvalidResultCount);
        }

        let config = self.config.read().unwrap().clone();

        // Step 1: embed the query
        let vectors = self
            .embedder
            .embed(&[query.to_string()])
            .await
            .map_err(|source| QuarryError::Embedding { source })?;
        let query_vector = vectors.into_iter().next().ok_or_else(|| {
            QuarryError::Embedding {
                source: EmbeddingError::Generation("provider returned no vector".to_string()),
            }
        })?;

        // Step 2: over-fetch a candidate pool so the diversity reranker
        // has material to trade off against
        let pool_size = config.candidate_pool_size(k);
        debug!(
            "Fetching {} candidates from index '{}' for k={}",
            pool_size, index, k
        );
        let raw = self
            .search_index
            .hybrid_search(index, query, &query_vector, pool_size)
            .await
            .map_err(|source| QuarryError::Search { source })?;

        // Step 3: normalize scores and extract snippets
        let candidates = normalize_hits(&raw.hits, query, &config);

        // Step 4: diversity-aware selection of the final k
        let results = apply_mmr(candidates, k, config.diversity_lambda);

        info!(
            "Hybrid search on '{}': selected {} of {} candidates",
            index,
            results.len(),
            raw.hits.len()
        );

        Ok(results)
    }
}
