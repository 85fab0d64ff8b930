//! Application layer for survey-sim
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    event_logger::{NoSimulationLogger, SimulationEvent, SimulationEventLogger},
    progress::{NoProgress, SimulationProgressNotifier},
    rate_estimator::{EstimateRequest, EstimatorError, RateEstimator},
    simulation_store::{RecordId, SimulationStore, StoreError},
};
pub use use_cases::load_simulation::{
    LoadSimulationError, LoadSimulationOutput, LoadSimulationUseCase,
};
pub use use_cases::run_simulation::{
    RunSimulationError, RunSimulationInput, RunSimulationOutput, RunSimulationUseCase,
};
