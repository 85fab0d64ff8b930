//! Configuration file loading for survey-sim
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SURVEY_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./survey.toml` or `./.survey.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/survey-sim/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, EstimatorKind, FileConfig, FileEstimatorConfig, FileLoggingConfig,
    FileOutputConfig, FileSimulationConfig, FileStoreConfig,
};
pub use loader::ConfigLoader;
