//! Score normalization and result assembly

use crate::config::RetrievalConfig;
use crate::document::{Document, RawHit, ScoredResult};
use crate::retrieval::snippet::extract_snippet;

/// Turn raw engine hits into presentation-ready, comparably-scaled results.
///
/// Scores are min-max scaled over the candidate batch: the top raw score
/// maps to 1.0 and the bottom to 0.0. A flat batch carries no
/// discriminative signal, so every hit then scores 1.0 rather than
/// dividing by zero. The normalized score is apportioned into
/// `lexical_score` and `vector_score` by the configured weights; the
/// engine returns one fused score, so the split shows which weight
/// dominates rather than measuring two retrieval paths.
///
/// # Arguments
/// * `hits` - raw hits, pre-sorted descending by fused score
/// * `query` - original query text, used for snippet extraction
/// * `config` - weights and snippet length
pub fn normalize_hits(hits: &[RawHit], query: &str, config: &RetrievalConfig) -> Vec<ScoredResult> {
    if hits.is_empty() {
        return Vec::new();
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for hit in hits {
        min = min.min(hit.score);
        max = max.max(hit.score);
    }
    let range = max - min;

    hits.iter()
        .map(|hit| {
            let score = if range > 0.0 {
                (hit.score - min) / range
            } else {
                1.0
            };

            let document = Document::from_source(&hit.id, &hit.source);
            let snippet = extract_snippet(&document.text, query, config.max_snippet_length);

            ScoredResult {
                score,
                lexical_score: score * config.lexical_weight,
                vector_score: score * config.vector_weight,
                snippet,
                document,
            }
        })
        .collect()
}
