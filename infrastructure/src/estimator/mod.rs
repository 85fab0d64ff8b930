//! Rate estimator adapters
//!
//! Implementations of the [`RateEstimator`](survey_application::RateEstimator)
//! port.
//!
//! | Adapter | Source of estimates | Feature |
//! |---------|---------------------|---------|
//! | [`UniformRateEstimator`] | even split over the declared options | - |
//! | [`FileRateEstimator`] | JSON fixture keyed by persona group and question | - |
//! | `HttpRateEstimator` | remote endpoint, free-form reply parsed for a JSON object | `http-estimator` |

mod file;
#[cfg(feature = "http-estimator")]
mod http;
mod uniform;

pub use file::FileRateEstimator;
#[cfg(feature = "http-estimator")]
pub use http::HttpRateEstimator;
pub use uniform::UniformRateEstimator;

use thiserror::Error;

/// Errors raised while constructing an estimator adapter
#[derive(Debug, Error)]
pub enum EstimatorSetupError {
    #[error("Failed to read estimate fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Estimate fixture is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid estimate fixture: {0}")]
    InvalidFixture(String),

    #[error("Invalid estimator endpoint '{0}'")]
    InvalidEndpoint(String),

    #[cfg(feature = "http-estimator")]
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
