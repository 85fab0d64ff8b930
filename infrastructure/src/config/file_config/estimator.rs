//! Estimator configuration from TOML (`[estimator]` section)
//!
//! ```toml
//! [estimator]
//! kind = "file"            # "uniform" | "file" | "http"
//! path = "rates.json"      # required for kind = "file"
//! endpoint = "http://..."  # required for kind = "http"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use survey_domain::{ConfigIssue, ConfigIssueCode};

/// Which [`RateEstimator`](survey_application::RateEstimator) adapter to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatorKind {
    #[default]
    Uniform,
    File,
    Http,
}

impl EstimatorKind {
    pub const VALID: [&'static str; 3] = ["uniform", "file", "http"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EstimatorKind::Uniform => "uniform",
            EstimatorKind::File => "file",
            EstimatorKind::Http => "http",
        }
    }
}

impl FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uniform" | "offline" => Ok(EstimatorKind::Uniform),
            "file" => Ok(EstimatorKind::File),
            "http" => Ok(EstimatorKind::Http),
            other => Err(format!("unknown estimator kind '{}'", other)),
        }
    }
}

impl std::fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEstimatorConfig {
    pub kind: String,
    pub path: Option<PathBuf>,
    pub endpoint: Option<String>,
}

impl Default for FileEstimatorConfig {
    fn default() -> Self {
        Self {
            kind: EstimatorKind::Uniform.as_str().to_string(),
            path: None,
            endpoint: None,
        }
    }
}

impl FileEstimatorConfig {
    /// Parse the kind string, reporting an issue for unknown values
    pub fn parse_kind(&self) -> (Option<EstimatorKind>, Vec<ConfigIssue>) {
        match self.kind.parse() {
            Ok(kind) => (Some(kind), Vec::new()),
            Err(_) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "estimator.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: EstimatorKind::VALID.iter().map(|s| s.to_string()).collect(),
                    },
                    format!(
                        "estimator.kind: unknown value '{}', expected one of {}",
                        self.kind,
                        EstimatorKind::VALID.join(", ")
                    ),
                )],
            ),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (kind, mut issues) = self.parse_kind();

        match kind {
            Some(EstimatorKind::File) if self.path.is_none() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingField {
                        field: "estimator.path".to_string(),
                    },
                    "estimator.path is required when kind = \"file\"",
                ));
            }
            Some(EstimatorKind::Http) if self.endpoint.is_none() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingField {
                        field: "estimator.endpoint".to_string(),
                    },
                    "estimator.endpoint is required when kind = \"http\"",
                ));
            }
            _ => {}
        }

        issues
    }
}
