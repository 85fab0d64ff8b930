//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as estimator timeouts and how many questions are allocated at once.

use std::time::Duration;

/// Default number of questions estimated concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Application behavior configuration.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Maximum time to wait for one estimator call before falling back.
    pub timeout: Option<Duration>,
    /// Maximum number of questions in flight at once (at least 1).
    pub max_concurrency: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(seconds)),
            ..Default::default()
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Default::default()
        }
    }

    /// Set the concurrency limit (clamped to at least 1).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }
}
