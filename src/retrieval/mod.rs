//! Hybrid retrieval and diversity reranking
//!
//! Orchestrates query embedding, fused index search, score normalization,
//! snippet extraction, and MMR reranking into a single facade.

mod mmr;
mod normalize;
mod retriever;
mod snippet;

pub use mmr::{apply_mmr, jaccard_similarity};
pub use normalize::normalize_hits;
pub use retriever::Retriever;
pub use snippet::extract_snippet;
