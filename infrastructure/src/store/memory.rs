//! Process-local store, used when no store directory is configured

use super::{check_record_id, new_record_id};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use survey_application::{RecordId, SimulationStore, StoreError};
use survey_domain::SimulationResult;

#[derive(Debug, Default)]
pub struct InMemorySimulationStore {
    records: Mutex<HashMap<RecordId, SimulationResult>>,
}

impl InMemorySimulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<RecordId, SimulationResult>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Corrupt("record map lock poisoned".to_string()))
    }
}

#[async_trait]
impl SimulationStore for InMemorySimulationStore {
    async fn save(&self, result: &SimulationResult) -> Result<RecordId, StoreError> {
        let id = new_record_id();
        let mut records = self.lock()?;
        if records.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        records.insert(id.clone(), result.clone());
        Ok(id)
    }

    async fn load(&self, id: &RecordId) -> Result<SimulationResult, StoreError> {
        check_record_id(id)?;
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list(&self) -> Result<Vec<RecordId>, StoreError> {
        let mut ids: Vec<RecordId> = self.lock()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
