//! Analysis error taxonomy.
//!
//! `InsufficientData` and `ComputationFault` are absorbed inside the
//! assembler and only surface as degraded snapshot fields. `InvalidInput`
//! is the one kind that reaches callers: the core never substitutes a value
//! for a user-supplied trade parameter.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {available} bars < required {required}")]
    InsufficientData { available: usize, required: usize },

    #[error("computation fault in {indicator}: {reason}")]
    ComputationFault {
        indicator: &'static str,
        reason: String,
    },

    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl AnalysisError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
