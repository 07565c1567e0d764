//! Integration tests for the hybrid retrieval pipeline
//!
//! Drives the full facade against in-memory mock providers: validation
//! ordering, error wrapping, over-fetch sizing, normalization, and
//! diversity reranking.

use async_trait::async_trait;
use quarry::config::MIN_CANDIDATE_POOL;
use quarry::document::{RawHit, RawSearchResult};
use quarry::provider::{
    EmbeddingError, EmbeddingProvider, SearchIndexProvider, SearchProviderError,
};
use quarry::retrieval::Retriever;
use quarry::QuarryError;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct StaticEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Generation("model unavailable".to_string()))
    }
}

#[derive(Default)]
struct StaticIndex {
    hits: Vec<RawHit>,
    calls: AtomicUsize,
    last_size: AtomicUsize,
}

impl StaticIndex {
    fn with_hits(hits: Vec<RawHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SearchIndexProvider for StaticIndex {
    async fn hybrid_search(
        &self,
        _index: &str,
        _query: &str,
        _query_vector: &[f32],
        size: usize,
    ) -> Result<RawSearchResult, SearchProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_size.store(size, Ordering::SeqCst);
        Ok(RawSearchResult {
            hits: self.hits.clone(),
            total: self.hits.len(),
        })
    }
}

struct FailingIndex;

#[async_trait]
impl SearchIndexProvider for FailingIndex {
    async fn hybrid_search(
        &self,
        _index: &str,
        _query: &str,
        _query_vector: &[f32],
        _size: usize,
    ) -> Result<RawSearchResult, SearchProviderError> {
        Err(SearchProviderError::Backend(anyhow::anyhow!(
            "index unreachable"
        )))
    }
}

fn hit(id: &str, score: f32, topic: &str, text: &str) -> RawHit {
    let mut source = serde_json::Map::new();
    source.insert("id".to_string(), json!(id));
    source.insert("topic".to_string(), json!(topic));
    source.insert("section".to_string(), json!("overview"));
    source.insert("text".to_string(), json!(text));
    RawHit {
        id: id.to_string(),
        score,
        source,
    }
}

fn retriever_over(hits: Vec<RawHit>) -> (Retriever, Arc<StaticEmbedder>, Arc<StaticIndex>) {
    let embedder = Arc::new(StaticEmbedder::default());
    let index = Arc::new(StaticIndex::with_hits(hits));
    let retriever = Retriever::new(embedder.clone(), index.clone());
    (retriever, embedder, index)
}

#[tokio::test]
async fn test_relevance_order_preserved_when_pool_equals_k() {
    // Three candidates, no room to diversify: original relevance order
    // comes back, normalized to [0, 1]
    let (retriever, _, _) = retriever_over(vec![
        hit("1", 0.95, "Machine Learning", "supervised models learn from labels"),
        hit("2", 0.87, "Deep Learning", "convolutional networks process images"),
        hit("3", 0.82, "Machine Learning", "decision trees split on features"),
    ]);

    let results = retriever
        .hybrid_search("articles", "learning", 3)
        .await
        .unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    assert_eq!(results[0].score, 1.0);
    let expected_middle = (0.87 - 0.82) / (0.95 - 0.82);
    assert!((results[1].score - expected_middle).abs() < 1e-6);
    assert_eq!(results[2].score, 0.0);

    // Default weights apportion the score evenly
    for result in &results {
        assert!((result.lexical_score - result.score * 0.5).abs() < 1e-6);
        assert!((result.vector_score - result.score * 0.5).abs() < 1e-6);
        assert!((result.lexical_score + result.vector_score - result.score).abs() < 1e-6);
    }
}

#[tokio::test]
async fn test_diversity_pressure_breaks_topic_collapse() {
    // Three near-duplicate Machine Learning passages outscore one Deep
    // Learning passage; diversity pressure still surfaces the alternative
    let (retriever, _, _) = retriever_over(vec![
        hit(
            "ml-1",
            0.95,
            "Machine Learning",
            "gradient descent optimizes machine learning model weights over labeled training data",
        ),
        hit(
            "ml-2",
            0.90,
            "Machine Learning",
            "gradient descent optimizes machine learning model weights over labeled training batches",
        ),
        hit(
            "dl-1",
            0.85,
            "Deep Learning",
            "convolutional networks stack layered feature detectors for image recognition",
        ),
        hit(
            "ml-3",
            0.80,
            "Machine Learning",
            "gradient descent optimizes machine learning model weights over labeled training sets",
        ),
    ]);

    let results = retriever
        .hybrid_search("articles", "machine learning", 3)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    let mut topics: Vec<&str> = results.iter().map(|r| r.document.topic.as_str()).collect();
    topics.sort_unstable();
    topics.dedup();
    assert!(
        topics.len() >= 2,
        "expected at least 2 distinct topics, got {:?}",
        topics
    );
}

#[tokio::test]
async fn test_flat_scores_normalize_to_one() {
    let (retriever, _, _) = retriever_over(vec![
        hit("1", 1.5, "Machine Learning", "alpha"),
        hit("2", 1.5, "Deep Learning", "beta"),
        hit("3", 1.5, "Statistics", "gamma"),
    ]);

    let results = retriever.hybrid_search("articles", "alpha", 3).await.unwrap();

    for result in &results {
        assert_eq!(result.score, 1.0);
    }
}

#[tokio::test]
async fn test_embedding_failure_is_fatal() {
    let index = Arc::new(StaticIndex::with_hits(vec![hit(
        "1",
        1.0,
        "Machine Learning",
        "alpha",
    )]));
    let retriever = Retriever::new(Arc::new(FailingEmbedder), index.clone());

    let err = retriever
        .hybrid_search("articles", "query", 3)
        .await
        .unwrap_err();

    assert!(matches!(err, QuarryError::Embedding { .. }));
    assert!(err.to_string().contains("failed to embed query"));
    // No degraded lexical-only fallback: the index is never consulted
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_failure_is_wrapped() {
    let retriever = Retriever::new(Arc::new(StaticEmbedder::default()), Arc::new(FailingIndex));

    let err = retriever
        .hybrid_search("articles", "query", 3)
        .await
        .unwrap_err();

    assert!(matches!(err, QuarryError::Search { .. }));
    assert!(err.to_string().contains("failed to execute search"));
}

#[tokio::test]
async fn test_validation_precedes_network_calls() {
    let (retriever, embedder, index) = retriever_over(vec![hit("1", 1.0, "ML", "alpha")]);

    let err = retriever.hybrid_search("articles", "   ", 3).await.unwrap_err();
    assert!(matches!(err, QuarryError::EmptyQuery));

    let err = retriever.hybrid_search("articles", "query", 0).await.unwrap_err();
    assert!(matches!(err, QuarryError::InvalidResultCount));

    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_candidate_pool_overfetch() {
    let (retriever, _, index) = retriever_over(vec![hit("1", 1.0, "ML", "alpha")]);

    retriever.hybrid_search("articles", "alpha", 3).await.unwrap();
    assert_eq!(index.last_size.load(Ordering::SeqCst), MIN_CANDIDATE_POOL);

    retriever.hybrid_search("articles", "alpha", 15).await.unwrap();
    assert_eq!(index.last_size.load(Ordering::SeqCst), 30);
}

#[tokio::test]
async fn test_empty_candidate_pool_yields_empty_results() {
    let (retriever, _, _) = retriever_over(Vec::new());

    let results = retriever.hybrid_search("articles", "query", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_weight_setter_changes_decomposition() {
    let (retriever, _, _) = retriever_over(vec![
        hit("1", 2.0, "Machine Learning", "alpha"),
        hit("2", 1.0, "Deep Learning", "beta"),
    ]);

    retriever.set_weights(3.0, 1.0).unwrap();

    let results = retriever.hybrid_search("articles", "alpha", 2).await.unwrap();
    for result in &results {
        assert!((result.lexical_score - result.score * 0.75).abs() < 1e-6);
        assert!((result.vector_score - result.score * 0.25).abs() < 1e-6);
    }
}

#[tokio::test]
async fn test_snippet_respects_configured_length() {
    let long_text = format!("{} relevance {}", "x".repeat(200), "y".repeat(200));
    let (retriever, _, _) = retriever_over(vec![hit("1", 1.0, "ML", &long_text)]);

    retriever.set_max_snippet_length(40).unwrap();

    let results = retriever
        .hybrid_search("articles", "relevance", 1)
        .await
        .unwrap();

    assert_eq!(results[0].snippet.chars().count(), 40);
    assert!(results[0].snippet.contains("relevance"));
}

#[tokio::test]
async fn test_invalid_setter_arguments_rejected() {
    let (retriever, _, _) = retriever_over(Vec::new());
    let before = retriever.config();

    assert!(retriever.set_weights(0.0, 0.0).is_err());
    assert!(retriever.set_weights(-1.0, 2.0).is_err());
    assert!(retriever.set_diversity_lambda(1.5).is_err());
    assert!(retriever.set_diversity_lambda(-0.2).is_err());
    assert!(retriever.set_max_snippet_length(0).is_err());

    // Rejected input never mutates the configuration
    assert_eq!(retriever.config(), before);
}

#[tokio::test]
async fn test_lambda_one_degenerates_to_relevance_ranking() {
    let (retriever, _, _) = retriever_over(vec![
        hit("1", 0.9, "Machine Learning", "same text either way"),
        hit("2", 0.8, "Machine Learning", "same text either way"),
        hit("3", 0.7, "Machine Learning", "same text either way"),
    ]);

    retriever.set_diversity_lambda(1.0).unwrap();

    let results = retriever.hybrid_search("articles", "text", 3).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}
