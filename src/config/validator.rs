//! Configuration validation

use super::{ConfigError, RetrievalConfig, ValidationError};

/// Validates retrieval configuration values before use
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration, collecting every failure
    pub fn validate(config: &RetrievalConfig) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !config.lexical_weight.is_finite() || config.lexical_weight < 0.0 {
            errors.push(ValidationError::new(
                "lexical_weight",
                "must be a non-negative number",
            ));
        }
        if !config.vector_weight.is_finite() || config.vector_weight < 0.0 {
            errors.push(ValidationError::new(
                "vector_weight",
                "must be a non-negative number",
            ));
        }
        if config.lexical_weight + config.vector_weight == 0.0 {
            errors.push(ValidationError::new(
                "lexical_weight",
                "weights must not both be zero",
            ));
        }
        if !config.diversity_lambda.is_finite()
            || !(0.0..=1.0).contains(&config.diversity_lambda)
        {
            errors.push(ValidationError::new(
                "diversity_lambda",
                "must lie in [0, 1]",
            ));
        }
        if config.max_snippet_length == 0 {
            errors.push(ValidationError::new(
                "max_snippet_length",
                "must be positive",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation { errors })
        }
    }
}
