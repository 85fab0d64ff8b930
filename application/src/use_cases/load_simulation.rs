//! Load Simulation use case
//!
//! Reads a persisted simulation back, re-checks its invariants and rebuilds
//! the grouped view when the questionnaire is known.

use crate::ports::simulation_store::{RecordId, SimulationStore, StoreError};
use std::sync::Arc;
use survey_domain::{DomainError, Questionnaire, SectionResults, SimulationResult, group_by_section};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoadSimulationError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Stored record {id} is inconsistent: {source}")]
    Inconsistent { id: RecordId, source: DomainError },
}

#[derive(Debug, Clone)]
pub struct LoadSimulationOutput {
    pub record_id: RecordId,
    pub result: SimulationResult,
    /// Present only when a questionnaire was supplied
    pub grouped: Option<Vec<SectionResults>>,
}

/// Use case for reading a previously saved simulation
pub struct LoadSimulationUseCase<S: SimulationStore + 'static> {
    store: Arc<S>,
}

impl<S: SimulationStore + 'static> LoadSimulationUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        id: &RecordId,
        questionnaire: Option<&Questionnaire>,
    ) -> Result<LoadSimulationOutput, LoadSimulationError> {
        let result = self.store.load(id).await?;
        result
            .verify()
            .map_err(|source| LoadSimulationError::Inconsistent {
                id: id.clone(),
                source,
            })?;
        info!(
            "Loaded simulation {} ({} questions, {} respondents)",
            id,
            result.distributions.len(),
            result.sample_size
        );

        let grouped = questionnaire.map(|q| group_by_section(q, &result.distributions));

        Ok(LoadSimulationOutput {
            record_id: id.clone(),
            result,
            grouped,
        })
    }

    /// All stored record ids
    pub async fn list(&self) -> Result<Vec<RecordId>, LoadSimulationError> {
        Ok(self.store.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use survey_domain::{
        Distribution, QuestionDistributions, Question, Section, SimulationMetadata,
    };

    struct FixedStore {
        records: HashMap<String, SimulationResult>,
    }

    #[async_trait]
    impl SimulationStore for FixedStore {
        async fn save(&self, _result: &SimulationResult) -> Result<RecordId, StoreError> {
            Err(StoreError::Corrupt("read-only".to_string()))
        }

        async fn load(&self, id: &RecordId) -> Result<SimulationResult, StoreError> {
            self.records
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.clone()))
        }

        async fn list(&self) -> Result<Vec<RecordId>, StoreError> {
            let mut ids: Vec<RecordId> = self.records.keys().map(|k| RecordId::new(k.as_str())).collect();
            ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            Ok(ids)
        }
    }

    fn result_with_size(sample_size: u64) -> SimulationResult {
        let mut distributions = QuestionDistributions::new();
        distributions.insert(
            "Would you buy it?",
            Distribution::from_counts([("Yes".to_string(), 6), ("No".to_string(), 4)]).unwrap(),
        );
        SimulationResult::new(sample_size, distributions, SimulationMetadata::default())
    }

    fn store() -> Arc<FixedStore> {
        let mut records = HashMap::new();
        records.insert("good".to_string(), result_with_size(10));
        records.insert("bad".to_string(), result_with_size(12));
        Arc::new(FixedStore { records })
    }

    #[tokio::test]
    async fn test_load_rebuilds_grouped_view() {
        let use_case = LoadSimulationUseCase::new(store());
        let questionnaire = Questionnaire::new(
            "Appeal",
            vec![Section::new(
                "Main",
                vec![Question::new("Would you buy it?", ["Yes", "No"])],
            )],
        );

        let output = use_case
            .execute(&RecordId::from("good"), Some(&questionnaire))
            .await
            .unwrap();

        assert_eq!(output.result.sample_size, 10);
        let grouped = output.grouped.unwrap();
        assert_eq!(grouped[0].questions[0].results[0].percentage, "60%");
    }

    #[tokio::test]
    async fn test_load_without_questionnaire_has_no_grouping() {
        let use_case = LoadSimulationUseCase::new(store());
        let output = use_case.execute(&RecordId::from("good"), None).await.unwrap();
        assert!(output.grouped.is_none());
    }

    #[tokio::test]
    async fn test_inconsistent_record_is_rejected() {
        let use_case = LoadSimulationUseCase::new(store());
        let err = use_case
            .execute(&RecordId::from("bad"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadSimulationError::Inconsistent { .. }));
    }

    #[tokio::test]
    async fn test_missing_record() {
        let use_case = LoadSimulationUseCase::new(store());
        let err = use_case
            .execute(&RecordId::from("nope"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LoadSimulationError::Store(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_ids() {
        let use_case = LoadSimulationUseCase::new(store());
        let ids = use_case.list().await.unwrap();
        assert_eq!(ids, vec![RecordId::from("bad"), RecordId::from("good")]);
    }
}
