//! Logging infrastructure: the simulation audit trail.
//!
//! Provides [`JsonlSimulationLogger`], a JSONL file writer that implements
//! the [`SimulationEventLogger`](survey_application::SimulationEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSimulationLogger;
