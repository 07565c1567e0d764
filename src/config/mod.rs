//! Retrieval configuration
//!
//! Tunable knobs for the hybrid retriever: score fusion weights, diversity
//! pressure, and snippet length. Created with defaults, adjusted through
//! validated setters, and loadable from TOML with environment variable
//! overrides in the `QUARRY_RETRIEVAL__KEY` format.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod validator;

pub use validator::ConfigValidator;

/// Default weight of the lexical contribution to the fused score
pub const DEFAULT_LEXICAL_WEIGHT: f32 = 0.5;

/// Default weight of the vector contribution to the fused score
pub const DEFAULT_VECTOR_WEIGHT: f32 = 0.5;

/// Default relevance/diversity trade-off for MMR reranking
pub const DEFAULT_DIVERSITY_LAMBDA: f32 = 0.7;

/// Default snippet window length, in characters
pub const DEFAULT_MAX_SNIPPET_LENGTH: usize = 200;

/// Over-fetch multiplier applied to the requested result count when
/// sizing the candidate pool
pub const CANDIDATE_OVERFETCH_FACTOR: usize = 2;

/// Lower bound on the candidate pool handed to the diversity reranker
pub const MIN_CANDIDATE_POOL: usize = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Fusion weights must be non-negative and not both zero
    #[error("invalid weights ({lexical}, {vector}): must be non-negative and not both zero")]
    InvalidWeights { lexical: f32, vector: f32 },

    /// Diversity lambda must lie in [0, 1]
    #[error("diversity lambda {0} out of range [0, 1]")]
    InvalidLambda(f32),

    /// Snippet length must be positive
    #[error("max snippet length must be positive")]
    InvalidSnippetLength,

    /// Configuration validation errors
    #[error("configuration validation failed: {errors:?}")]
    Validation { errors: Vec<ValidationError> },

    /// Invalid configuration value from an environment override
    #[error("invalid configuration value at {path}: {message}")]
    InvalidValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Tunable retrieval parameters
///
/// `lexical_weight` and `vector_weight` always sum to 1; the setters
/// renormalize their inputs so relative ratios are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Weight of the lexical signal in the score decomposition
    pub lexical_weight: f32,

    /// Weight of the vector signal in the score decomposition
    pub vector_weight: f32,

    /// MMR trade-off: 1.0 is pure relevance ranking, 0.0 ignores relevance
    /// after the first pick and purely minimizes redundancy
    pub diversity_lambda: f32,

    /// Snippet window length, in characters
    pub max_snippet_length: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            lexical_weight: DEFAULT_LEXICAL_WEIGHT,
            vector_weight: DEFAULT_VECTOR_WEIGHT,
            diversity_lambda: DEFAULT_DIVERSITY_LAMBDA,
            max_snippet_length: DEFAULT_MAX_SNIPPET_LENGTH,
        }
    }
}

impl RetrievalConfig {
    /// Set the fusion weights, renormalized to sum to exactly 1.
    ///
    /// Rejects negative or non-finite inputs and the all-zero pair.
    pub fn set_weights(&mut self, lexical: f32, vector: f32) -> Result<(), ConfigError> {
        if !lexical.is_finite() || !vector.is_finite() || lexical < 0.0 || vector < 0.0 {
            return Err(ConfigError::InvalidWeights { lexical, vector });
        }
        let total = lexical + vector;
        if total == 0.0 {
            return Err(ConfigError::InvalidWeights { lexical, vector });
        }
        self.lexical_weight = lexical / total;
        self.vector_weight = vector / total;
        Ok(())
    }

    /// Set the MMR relevance/diversity trade-off.
    ///
    /// Out-of-range input is rejected with an error rather than silently
    /// ignored, so caller bugs surface immediately.
    pub fn set_diversity_lambda(&mut self, lambda: f32) -> Result<(), ConfigError> {
        if !lambda.is_finite() || !(0.0..=1.0).contains(&lambda) {
            return Err(ConfigError::InvalidLambda(lambda));
        }
        self.diversity_lambda = lambda;
        Ok(())
    }

    /// Set the snippet window length, in characters
    pub fn set_max_snippet_length(&mut self, length: usize) -> Result<(), ConfigError> {
        if length == 0 {
            return Err(ConfigError::InvalidSnippetLength);
        }
        self.max_snippet_length = length;
        Ok(())
    }

    /// Candidate pool size fetched from the index for a requested `k`.
    ///
    /// Over-fetching gives the diversity reranker material to trade off
    /// against; too small starves diversity, too large wastes index
    /// round-trip cost.
    pub fn candidate_pool_size(&self, k: usize) -> usize {
        (k * CANDIDATE_OVERFETCH_FACTOR).max(MIN_CANDIDATE_POOL)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: RetrievalConfig = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        // Loaded weights express a ratio; bring them back to a unit sum
        config.set_weights(config.lexical_weight, config.vector_weight)?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: QUARRY_RETRIEVAL__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("QUARRY_RETRIEVAL__") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<(), ConfigError> {
        let parse_f32 = |value: &str| -> Result<f32, ConfigError> {
            value.parse().map_err(|_| ConfigError::InvalidValue {
                path: path.to_string(),
                message: format!("Cannot parse '{}' as float", value),
            })
        };

        match path {
            "LEXICAL_WEIGHT" => {
                self.lexical_weight = parse_f32(value)?;
            }
            "VECTOR_WEIGHT" => {
                self.vector_weight = parse_f32(value)?;
            }
            "DIVERSITY_LAMBDA" => {
                self.set_diversity_lambda(parse_f32(value)?)?;
            }
            "MAX_SNIPPET_LENGTH" => {
                let length = value.parse().map_err(|_| ConfigError::InvalidValue {
                    path: path.to_string(),
                    message: format!("Cannot parse '{}' as integer", value),
                })?;
                self.set_max_snippet_length(length)?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }
}
