//! Simulation configuration from TOML (`[simulation]` section)
//!
//! ```toml
//! [simulation]
//! sample_size = 100       # respondents when no persona file is given
//! timeout_seconds = 30    # per estimator call; omit for no limit
//! max_concurrency = 8     # questions estimated in parallel
//! ```

use serde::{Deserialize, Serialize};
use survey_application::BehaviorConfig;
use survey_application::config::DEFAULT_MAX_CONCURRENCY;
use survey_domain::{ConfigIssue, ConfigIssueCode};

pub const DEFAULT_SAMPLE_SIZE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimulationConfig {
    pub sample_size: u64,
    pub timeout_seconds: Option<u64>,
    pub max_concurrency: usize,
}

impl Default for FileSimulationConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            timeout_seconds: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl FileSimulationConfig {
    /// Convert to the application-level runtime knobs
    pub fn to_behavior(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(self.timeout_seconds)
            .with_max_concurrency(self.max_concurrency)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.sample_size == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroSampleSize,
                "simulation.sample_size must be at least 1",
            ));
        }

        if self.timeout_seconds == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "simulation.timeout_seconds cannot be 0",
            ));
        }

        if self.max_concurrency == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroConcurrency,
                "simulation.max_concurrency is 0, using 1",
            ));
        }

        issues
    }
}
