//! Infrastructure layer for survey-sim
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod estimator;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, EstimatorKind, FileConfig, FileEstimatorConfig,
    FileLoggingConfig, FileOutputConfig, FileSimulationConfig, FileStoreConfig,
};
#[cfg(feature = "http-estimator")]
pub use estimator::HttpRateEstimator;
pub use estimator::{EstimatorSetupError, FileRateEstimator, UniformRateEstimator};
pub use logging::JsonlSimulationLogger;
pub use store::{InMemorySimulationStore, JsonFileSimulationStore};
