//! Fixture-backed estimator
//!
//! Reads estimates from a JSON document shaped as
//!
//! ```json
//! {
//!   "students": { "Favourite colour?": { "Red": 0.6, "Green": 0.3, "Blue": 0.1 } },
//!   "*":        { "Would you buy it?": "{\"Yes\": \"55%\", \"No\": \"45%\"}" }
//! }
//! ```
//!
//! Group `"*"` applies to any persona group without its own entry. Values are
//! either estimate objects or free-form text containing one.

use super::EstimatorSetupError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::Path;
use survey_application::{EstimateRequest, EstimatorError, RateEstimator};
use survey_domain::{RawEstimate, parse_rate_estimate};
use tracing::debug;

const WILDCARD_GROUP: &str = "*";

#[derive(Debug, Clone)]
pub struct FileRateEstimator {
    groups: Map<String, Value>,
}

impl FileRateEstimator {
    /// Load a fixture file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EstimatorSetupError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let estimator = Self::from_json_str(&content)?;
        debug!(
            "Loaded estimate fixture {} ({} groups)",
            path.as_ref().display(),
            estimator.groups.len()
        );
        Ok(estimator)
    }

    pub fn from_json_str(content: &str) -> Result<Self, EstimatorSetupError> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Object(groups) = value else {
            return Err(EstimatorSetupError::InvalidFixture(
                "top level must be an object keyed by persona group id".to_string(),
            ));
        };
        if let Some((id, _)) = groups.iter().find(|(_, v)| !v.is_object()) {
            return Err(EstimatorSetupError::InvalidFixture(format!(
                "entry for group '{}' must be an object keyed by question text",
                id
            )));
        }
        Ok(Self { groups })
    }

    fn lookup(&self, group_id: &str, question: &str) -> Option<&Value> {
        [group_id, WILDCARD_GROUP]
            .iter()
            .filter_map(|id| self.groups.get(*id))
            .find_map(|questions| questions.get(question))
    }
}

#[async_trait]
impl RateEstimator for FileRateEstimator {
    async fn estimate(&self, request: &EstimateRequest) -> Result<RawEstimate, EstimatorError> {
        let value = self
            .lookup(&request.persona_group.id, &request.question.text)
            .ok_or_else(|| {
                EstimatorError::Unavailable(format!(
                    "no fixture entry for group '{}'",
                    request.persona_group.id
                ))
            })?;

        match value {
            Value::Object(_) => serde_json::from_value(value.clone())
                .map_err(|e| EstimatorError::Malformed(e.to_string())),
            Value::String(text) => parse_rate_estimate(text)
                .ok_or_else(|| EstimatorError::Malformed("no estimate object in text".to_string())),
            other => Err(EstimatorError::Malformed(format!(
                "expected an object or text, got {}",
                other
            ))),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}
