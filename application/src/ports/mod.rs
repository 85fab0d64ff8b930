//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod event_logger;
pub mod progress;
pub mod rate_estimator;
pub mod simulation_store;
