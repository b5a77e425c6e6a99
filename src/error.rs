// src/error.rs

use thiserror::Error;

use crate::models::Tier;

/// Failures of the resolution pipeline that callers may want to match on.
///
/// These travel inside `anyhow::Error`; use `downcast_ref::<ResolutionError>()`
/// to recover the variant.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Classification failed for mention '{mention}': {reason}")]
    ClassificationFailure { mention: String, reason: String },

    #[error("Classifier returned unknown label '{label}'")]
    UnknownLabel { label: String },

    #[error("Similarity threshold {value} for the {tier} tier is outside [0.0, 1.0]")]
    InvalidThreshold { tier: Tier, value: f64 },

    #[error("Similarity grouping was invoked on an empty sequence")]
    EmptyGroupingInput,

    #[error("Invalid configuration value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },
}

/// Checks that a similarity threshold is a finite value in [0, 1].
pub fn validate_threshold(tier: Tier, value: f64) -> Result<(), ResolutionError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ResolutionError::InvalidThreshold { tier, value })
    }
}
