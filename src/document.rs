//! Indexed documents and scored retrieval results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A unit of indexed content
///
/// `id` is unique within an index. `embedding` dimensionality is constant
/// across all documents of one index; a mismatch is an ingestion error and
/// is not handled here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    /// Short categorical label, used for lexical search and diversity
    pub topic: String,

    /// Short categorical label, used for lexical search and diversity
    pub section: String,

    /// Main content: lexical search target, vector source, and snippet source
    pub text: String,

    #[serde(default)]
    pub embedding: Vec<f32>,

    /// Opaque passthrough metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Rebuild a document from the key-value snapshot attached to a raw hit.
    ///
    /// The field names (`id`, `topic`, `section`, `text`, `metadata`,
    /// `created_at`) are a contract with the index service. Missing or
    /// mistyped fields map to the field's default value rather than an
    /// error; the hit-level id backfills a missing `id`.
    pub fn from_source(hit_id: &str, source: &Map<String, Value>) -> Self {
        let string_field = |key: &str| -> String {
            source
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let timestamp_field = |key: &str| -> Option<DateTime<Utc>> {
            source
                .get(key)
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc))
        };

        let mut id = string_field("id");
        if id.is_empty() {
            id = hit_id.to_string();
        }

        let metadata = source
            .get("metadata")
            .and_then(Value::as_object)
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(key, value)| {
                        value.as_str().map(|s| (key.clone(), s.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id,
            topic: string_field("topic"),
            section: string_field("section"),
            text: string_field("text"),
            embedding: Vec::new(),
            metadata,
            created_at: timestamp_field("created_at"),
            updated_at: timestamp_field("updated_at"),
        }
    }
}

/// One scored result from the search index provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHit {
    pub id: String,

    /// Fused relevance score, unbounded and engine-defined
    pub score: f32,

    /// Key-value snapshot of the stored document fields
    #[serde(default)]
    pub source: Map<String, Value>,
}

/// Raw response from the search index provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSearchResult {
    /// Hits pre-sorted descending by fused relevance score
    pub hits: Vec<RawHit>,
    pub total: usize,
}

/// A retrieval result with normalized score and extracted snippet
///
/// `lexical_score` and `vector_score` are apportioned from the single fused
/// engine score by the configured weights. They show which weight dominates
/// a result, not two independently measured retrieval paths; the engine
/// only ever returns one fused score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub document: Document,

    /// Relevance normalized to [0, 1] over the candidate batch
    pub score: f32,

    /// `score * lexical_weight`
    pub lexical_score: f32,

    /// `score * vector_weight`
    pub vector_score: f32,

    /// Bounded-length excerpt centered on query-relevant content
    pub snippet: String,
}
