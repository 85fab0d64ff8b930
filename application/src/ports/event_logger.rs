//! Port for the simulation audit trail.
//!
//! Defines the [`SimulationEventLogger`] trait for recording simulation
//! events (run started, fallback substituted, question allocated, record
//! saved) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures an
//! auditable record of how every distribution was produced in a
//! machine-readable format (JSONL).

use serde_json::Value;

/// A structured simulation event for logging.
pub struct SimulationEvent {
    /// Event type identifier (e.g., "simulation_started", "estimate_fallback").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SimulationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging simulation events to a structured log.
///
/// The `log` method is synchronous and non-fallible: a failed audit write
/// never fails a simulation.
pub trait SimulationEventLogger: Send + Sync {
    /// Record a simulation event.
    fn log(&self, event: SimulationEvent);
}

/// No-op implementation for tests and when audit logging is disabled.
pub struct NoSimulationLogger;

impl SimulationEventLogger for NoSimulationLogger {
    fn log(&self, _event: SimulationEvent) {}
}
