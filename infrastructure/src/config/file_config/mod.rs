//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod estimator;
mod logging;
mod output;
mod simulation;
mod store;

pub use estimator::{EstimatorKind, FileEstimatorConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use simulation::FileSimulationConfig;
pub use store::FileStoreConfig;

use serde::{Deserialize, Serialize};
use survey_domain::ConfigIssue;
use thiserror::Error;

/// Raised when a configuration contains at least one error-level issue
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration: {}", .0.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<ConfigIssue>),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Sample size and concurrency settings
    pub simulation: FileSimulationConfig,
    /// Which rate estimator to use
    pub estimator: FileEstimatorConfig,
    /// Where simulation records are kept
    pub store: FileStoreConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Audit log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.simulation.validate();
        issues.extend(self.estimator.validate());
        issues
    }

    /// Fail if any issue is an error; warnings pass through.
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use survey_domain::{ConfigIssueCode, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[simulation]
sample_size = 250
timeout_seconds = 30
max_concurrency = 4

[estimator]
kind = "http"
endpoint = "http://localhost:8080/estimate"

[store]
directory = "./records"

[output]
format = "json"
color = false

[logging]
audit_log = "./audit.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.simulation.sample_size, 250);
        assert_eq!(config.simulation.timeout_seconds, Some(30));
        assert_eq!(config.simulation.max_concurrency, 4);
        assert_eq!(config.estimator.parse_kind().0, Some(EstimatorKind::Http));
        assert_eq!(config.store.directory, Some(PathBuf::from("./records")));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(
            config.logging.audit_log,
            Some(PathBuf::from("./audit.jsonl"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[simulation]
sample_size = 20
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.simulation.sample_size, 20);
        // Defaults should apply
        assert_eq!(config.simulation.max_concurrency, 8);
        assert!(config.simulation.timeout_seconds.is_none());
        assert_eq!(config.estimator.kind, "uniform");
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert!(config.ensure_valid().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_valid_collects_errors() {
        let mut config = FileConfig::default();
        config.simulation.sample_size = 0;
        config.estimator.kind = "file".to_string();

        let err = config.ensure_valid().unwrap_err();
        let ConfigValidationError::Invalid(issues) = &err;
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroSampleSize);
        assert!(err.to_string().starts_with("invalid configuration: "));
    }

    #[test]
    fn test_ensure_valid_passes_warnings_through() {
        let mut config = FileConfig::default();
        config.simulation.max_concurrency = 0;

        let warnings = config.ensure_valid().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ConfigIssueCode::ZeroConcurrency);
    }
}
