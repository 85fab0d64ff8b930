//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Simulation requested with no questions")]
    EmptyQuestionSet,

    #[error("Sample size must be at least 1 (got 0 for {0})")]
    ZeroSampleSize(String),

    #[error("Invalid estimate for option '{option}': {reason}")]
    InvalidEstimate { option: String, reason: String },

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Distribution does not satisfy its invariants: {0}")]
    InconsistentDistribution(String),
}

impl DomainError {
    /// Check if this error is fatal for the whole simulation
    /// (as opposed to a single question or group)
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::EmptyQuestionSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_question_set_display() {
        let error = DomainError::EmptyQuestionSet;
        assert_eq!(error.to_string(), "Simulation requested with no questions");
    }

    #[test]
    fn test_invalid_estimate_display() {
        let error = DomainError::InvalidEstimate {
            option: "Yes".to_string(),
            reason: "negative weight -1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid estimate for option 'Yes': negative weight -1"
        );
    }

    #[test]
    fn test_is_fatal() {
        assert!(DomainError::EmptyQuestionSet.is_fatal());
        assert!(!DomainError::ZeroSampleSize("group-a".to_string()).is_fatal());
    }
}
