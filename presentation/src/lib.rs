//! Presentation layer for survey-sim
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, SimulationReport};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use survey_domain::OutputFormat;
