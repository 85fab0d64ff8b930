//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for simulation results
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Section-by-section table for the terminal (default)
    Table,
    /// Full simulation result as JSON
    Json,
    /// Display-ready section/question/results JSON
    Grouped,
    /// Persisted wire form: question → option → count/pct
    Wire,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "grouped" => Ok(Self::Grouped),
            "wire" => Ok(Self::Wire),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}
