//! Rate estimator port
//!
//! Defines the interface for obtaining response-rate proposals from an
//! external estimator (typically an LLM-backed service).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use survey_domain::{PersonaGroup, Question, RawEstimate};
use thiserror::Error;

/// Errors that can occur while asking the estimator
///
/// None of these fail a simulation: the use case substitutes the fallback
/// estimate and records it in the result metadata.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("Estimator unavailable: {0}")]
    Unavailable(String),

    #[error("Estimator timed out")]
    Timeout,

    #[error("Malformed estimate: {0}")]
    Malformed(String),
}

/// Persona part of an estimate request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaContext {
    pub id: String,
    pub profile: serde_json::Value,
}

/// Question part of an estimate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionContext {
    pub text: String,
    pub options: Vec<String>,
}

/// Everything the estimator is told about one (group, question) pair
///
/// Serializes to
/// `{"research_objective": "...", "persona_group": {...}, "question": {"text", "options"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub research_objective: String,
    pub persona_group: PersonaContext,
    pub question: QuestionContext,
}

impl EstimateRequest {
    pub fn new(research_objective: &str, group: &PersonaGroup, question: &Question) -> Self {
        Self {
            research_objective: research_objective.to_string(),
            persona_group: PersonaContext {
                id: group.id.clone(),
                profile: group.profile.clone(),
            },
            question: QuestionContext {
                text: question.text().to_string(),
                options: question.options().to_vec(),
            },
        }
    }
}

/// Source of response-rate estimates
///
/// Implementations (adapters) live in the infrastructure layer. They may
/// return estimates whose labels or weights do not match the question; the
/// caller reconciles every estimate before allocation.
#[async_trait]
pub trait RateEstimator: Send + Sync {
    /// Propose a response distribution for one question and persona group
    async fn estimate(&self, request: &EstimateRequest) -> Result<RawEstimate, EstimatorError>;

    /// Short name used in logs and audit events
    fn name(&self) -> &str {
        "estimator"
    }
}

/// Lets the binary pick an adapter at runtime.
#[async_trait]
impl RateEstimator for Box<dyn RateEstimator> {
    async fn estimate(&self, request: &EstimateRequest) -> Result<RawEstimate, EstimatorError> {
        (**self).estimate(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let group = PersonaGroup::new("students", 30).with_profile(json!({"age": "18-24"}));
        let question = Question::new("Do you cycle?", ["Yes", "No"]);
        let request = EstimateRequest::new("Mobility study", &group, &question);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "research_objective": "Mobility study",
                "persona_group": {"id": "students", "profile": {"age": "18-24"}},
                "question": {"text": "Do you cycle?", "options": ["Yes", "No"]}
            })
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(EstimatorError::Timeout.to_string(), "Estimator timed out");
        assert_eq!(
            EstimatorError::Malformed("no JSON".to_string()).to_string(),
            "Malformed estimate: no JSON"
        );
    }
}
