//! Maximal Marginal Relevance reranking
//!
//! Greedy selection balancing per-item relevance against redundancy with
//! the already-selected set. Similarity is a lexical proxy for aboutness:
//! token overlap over a candidate's topic, section, and text, not
//! embedding-space distance.

use crate::document::ScoredResult;
use ahash::AHashSet;

/// Jaccard similarity between the unique whitespace-split tokens of two
/// strings, case-insensitive.
///
/// Symmetric, and 1.0 for identical non-empty inputs. An empty union
/// (both inputs empty) yields 0.0 rather than dividing by zero.
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
    jaccard_of_sets(&tokenize(a), &tokenize(b))
}

/// Re-rank `candidates` into the final top `k` with Maximal Marginal
/// Relevance.
///
/// # Arguments
/// * `candidates` - candidate pool sorted by normalized score descending
/// * `k` - number of results to select
/// * `lambda` - relevance/diversity trade-off in [0, 1]; 1.0 degenerates
///   to plain relevance ranking, 0.0 purely minimizes redundancy after the
///   first pick
///
/// # Returns
/// `min(k, candidates.len())` results in selection order. The single
/// highest-relevance candidate is always selected first; each further pick
/// maximizes `lambda * relevance - (1 - lambda) * max_similarity(c, selected)`,
/// with ties resolving to the earlier (more relevant) candidate.
pub fn apply_mmr(candidates: Vec<ScoredResult>, k: usize, lambda: f32) -> Vec<ScoredResult> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let target = k.min(candidates.len());

    // Tokenize each diversity key once; O(k * n) similarity evaluations
    // remain, which is fine for candidate pools in the tens
    let mut remaining: Vec<(ScoredResult, AHashSet<String>)> = candidates
        .into_iter()
        .map(|candidate| {
            let tokens = diversity_tokens(&candidate);
            (candidate, tokens)
        })
        .collect();

    let mut selected = Vec::with_capacity(target);
    let mut selected_tokens: Vec<AHashSet<String>> = Vec::with_capacity(target);

    // The relevance maximum seeds the selection
    let (first, first_tokens) = remaining.remove(0);
    selected.push(first);
    selected_tokens.push(first_tokens);

    while selected.len() < target && !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_score = f32::NEG_INFINITY;

        for (index, (candidate, tokens)) in remaining.iter().enumerate() {
            let max_similarity = selected_tokens
                .iter()
                .map(|prior| jaccard_of_sets(tokens, prior))
                .fold(0.0_f32, f32::max);

            let mmr_score = lambda * candidate.score - (1.0 - lambda) * max_similarity;
            if mmr_score > best_score {
                best_score = mmr_score;
                best_index = index;
            }
        }

        let (picked, tokens) = remaining.remove(best_index);
        selected.push(picked);
        selected_tokens.push(tokens);
    }

    selected
}

/// Diversity comparison key for a candidate: the tokens of its topic,
/// section, and text fields
fn diversity_tokens(result: &ScoredResult) -> AHashSet<String> {
    let document = &result.document;
    [
        document.topic.as_str(),
        document.section.as_str(),
        document.text.as_str(),
    ]
    .iter()
    .flat_map(|field| field.split_whitespace())
    .map(|token| token.to_lowercase())
    .collect()
}

fn tokenize(text: &str) -> AHashSet<String> {
    text.split_whitespace()
        .map(|token| token.to_lowercase())
        .collect()
}

fn jaccard_of_sets(a: &AHashSet<String>, b: &AHashSet<String>) -> f32 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f32 / union as f32
}
