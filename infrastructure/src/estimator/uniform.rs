//! Offline estimator that always proposes an even split

use async_trait::async_trait;
use survey_application::{EstimateRequest, EstimatorError, RateEstimator};
use survey_domain::{Question, RawEstimate, fallback};

/// Returns the fallback estimate for every question, so a simulation run
/// needs no external service.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRateEstimator;

impl UniformRateEstimator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RateEstimator for UniformRateEstimator {
    async fn estimate(&self, request: &EstimateRequest) -> Result<RawEstimate, EstimatorError> {
        let question = Question::try_new(
            request.question.text.as_str(),
            request.question.options.iter().map(String::as_str),
        )
        .ok_or_else(|| EstimatorError::Malformed("question text is empty".to_string()))?;
        Ok(fallback(&question))
    }

    fn name(&self) -> &str {
        "uniform"
    }
}
