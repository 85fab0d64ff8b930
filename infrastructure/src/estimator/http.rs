//! Remote estimator over HTTP
//!
//! POSTs the [`EstimateRequest`] JSON to an endpoint and extracts the first
//! JSON object from the reply body with
//! [`parse_rate_estimate`](survey_domain::parse_rate_estimate), so the
//! service may answer with a bare object or with prose around one.

use super::EstimatorSetupError;
use async_trait::async_trait;
use std::time::Duration;
use survey_application::{EstimateRequest, EstimatorError, RateEstimator};
use survey_domain::{RawEstimate, parse_rate_estimate};
use tracing::debug;

/// Client-side limit; the use case may apply a shorter one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum accepted reply size (1 MB)
const MAX_BODY_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpRateEstimator {
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl HttpRateEstimator {
    pub fn new(endpoint: &str) -> Result<Self, EstimatorSetupError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, EstimatorSetupError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|_| EstimatorSetupError::InvalidEndpoint(endpoint.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(EstimatorSetupError::InvalidEndpoint(endpoint.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("survey-sim/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl RateEstimator for HttpRateEstimator {
    async fn estimate(&self, request: &EstimateRequest) -> Result<RawEstimate, EstimatorError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstimatorError::Unavailable(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        if body.len() > MAX_BODY_SIZE {
            return Err(EstimatorError::Malformed(format!(
                "Response too large: {} bytes",
                body.len()
            )));
        }

        let text = String::from_utf8_lossy(&body);
        debug!(
            "Estimator reply for group {} ({} bytes)",
            request.persona_group.id,
            body.len()
        );
        parse_rate_estimate(&text)
            .ok_or_else(|| EstimatorError::Malformed("no estimate object in reply".to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn map_transport_error(e: reqwest::Error) -> EstimatorError {
    if e.is_timeout() {
        EstimatorError::Timeout
    } else {
        EstimatorError::Unavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_endpoints() {
        let estimator = HttpRateEstimator::new("http://localhost:8080/estimate").unwrap();
        assert_eq!(estimator.endpoint(), "http://localhost:8080/estimate");
    }

    #[test]
    fn test_rejects_invalid_endpoints() {
        assert!(matches!(
            HttpRateEstimator::new("not a url"),
            Err(EstimatorSetupError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            HttpRateEstimator::new("ftp://example.com/rates"),
            Err(EstimatorSetupError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let estimator =
            HttpRateEstimator::with_timeout("http://127.0.0.1:9/estimate", Duration::from_secs(2))
                .unwrap();
        let question = survey_domain::Question::new("Q?", ["A", "B"]);
        let group = survey_domain::PersonaGroup::new("g", 1);
        let request = EstimateRequest::new("objective", &group, &question);

        let err = estimator.estimate(&request).await.unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::Unavailable(_) | EstimatorError::Timeout
        ));
    }
}
