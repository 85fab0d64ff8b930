//! Simulation store port
//!
//! Persists finished simulation results as immutable records. Re-running a
//! simulation creates a new record; existing records are never edited.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use survey_domain::SimulationResult;
use thiserror::Error;

/// Identifier of a stored simulation record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors that can occur in a simulation store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Simulation record not found: {0}")]
    NotFound(RecordId),

    #[error("Simulation record already exists: {0}")]
    AlreadyExists(RecordId),

    #[error("Invalid record id: {0}")]
    InvalidId(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),
}

/// Persistence for simulation results
#[async_trait]
pub trait SimulationStore: Send + Sync {
    /// Persist a result as a new record
    async fn save(&self, result: &SimulationResult) -> Result<RecordId, StoreError>;

    /// Load a previously saved record
    async fn load(&self, id: &RecordId) -> Result<SimulationResult, StoreError>;

    /// Ids of all stored records
    async fn list(&self) -> Result<Vec<RecordId>, StoreError>;
}

#[async_trait]
impl SimulationStore for Box<dyn SimulationStore> {
    async fn save(&self, result: &SimulationResult) -> Result<RecordId, StoreError> {
        (**self).save(result).await
    }

    async fn load(&self, id: &RecordId) -> Result<SimulationResult, StoreError> {
        (**self).load(id).await
    }

    async fn list(&self) -> Result<Vec<RecordId>, StoreError> {
        (**self).list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_transparent_serde() {
        let id = RecordId::new("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        assert_eq!(id.to_string(), "abc-123");
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound(RecordId::from("missing"));
        assert_eq!(err.to_string(), "Simulation record not found: missing");
    }
}
