//! Run Simulation use case
//!
//! Orchestrates one simulation request: estimate every (group, question)
//! pair, allocate exact counts, persist the result.
//!
//! Questions are independent, so they are processed concurrently (bounded by
//! [`BehaviorConfig::max_concurrency`]) and reassembled in declared order.
//! Estimator failures never fail the run; the affected group falls back to
//! the uniform estimate and the question is flagged in the metadata.

use crate::config::BehaviorConfig;
use crate::ports::event_logger::{NoSimulationLogger, SimulationEvent, SimulationEventLogger};
use crate::ports::progress::{NoProgress, SimulationProgressNotifier};
use crate::ports::rate_estimator::{EstimateRequest, EstimatorError, RateEstimator};
use crate::ports::simulation_store::{RecordId, SimulationStore, StoreError};
use serde_json::json;
use std::sync::Arc;
use survey_domain::allocation::{DiscardedEntry, combine, fallback, normalize};
use survey_domain::{
    Distribution, DomainError, GroupContribution, GroupEstimate, PersonaGroup, Question, QuestionDistributions,
    Questionnaire, RawEstimate, SectionResults, SimulationMetadata, SimulationMode,
    SimulationResult, group_by_section,
};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a simulation run
#[derive(Error, Debug)]
pub enum RunSimulationError {
    #[error("No persona groups provided")]
    NoPersonaGroups,

    #[error("Single-group simulation needs exactly one persona group, got {0}")]
    SingleModeGroupCount(usize),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Allocation task failed: {0}")]
    TaskFailed(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunSimulationError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunSimulationError::Cancelled)
    }
}

/// Input for the RunSimulation use case
#[derive(Debug, Clone)]
pub struct RunSimulationInput {
    pub questionnaire: Questionnaire,
    pub groups: Vec<PersonaGroup>,
    pub mode: SimulationMode,
    /// Opaque narrative metadata, stored with the result unmodified
    pub narrative: serde_json::Value,
}

impl RunSimulationInput {
    /// Mode is `Single` for one group and `Combined` otherwise.
    pub fn new(questionnaire: Questionnaire, groups: Vec<PersonaGroup>) -> Self {
        let mode = if groups.len() == 1 {
            SimulationMode::Single
        } else {
            SimulationMode::Combined
        };
        Self {
            questionnaire,
            groups,
            mode,
            narrative: serde_json::Value::Null,
        }
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_narrative(mut self, narrative: serde_json::Value) -> Self {
        self.narrative = narrative;
        self
    }

    fn validate(&self) -> Result<u64, RunSimulationError> {
        if self.questionnaire.is_empty() {
            return Err(DomainError::EmptyQuestionSet.into());
        }
        if self.groups.is_empty() {
            return Err(RunSimulationError::NoPersonaGroups);
        }
        if self.mode == SimulationMode::Single && self.groups.len() != 1 {
            return Err(RunSimulationError::SingleModeGroupCount(self.groups.len()));
        }
        if let Some(group) = self.groups.iter().find(|g| g.sample_size == 0) {
            return Err(DomainError::ZeroSampleSize(format!("persona group '{}'", group.id)).into());
        }
        Ok(self.groups.iter().map(|g| g.sample_size).sum())
    }
}

/// Output of a completed simulation
#[derive(Debug, Clone)]
pub struct RunSimulationOutput {
    pub record_id: RecordId,
    pub result: SimulationResult,
    pub grouped: Vec<SectionResults>,
}

/// A fallback substitution for one group on one question
#[derive(Debug, Clone)]
struct FallbackRecord {
    group_id: String,
    reason: String,
}

/// Outcome of allocating one question
struct QuestionOutcome {
    distribution: Result<Distribution, DomainError>,
    fallbacks: Vec<FallbackRecord>,
    discarded: Vec<(String, DiscardedEntry)>,
}

/// What one group's estimator call produced
enum GroupEstimateOutcome {
    Usable {
        estimate: RawEstimate,
        discarded: Vec<DiscardedEntry>,
    },
    Fallback {
        reason: String,
        discarded: Vec<DiscardedEntry>,
    },
}

/// Use case for running a survey simulation
pub struct RunSimulationUseCase<E: RateEstimator + 'static, S: SimulationStore + 'static> {
    estimator: Arc<E>,
    store: Arc<S>,
    behavior: BehaviorConfig,
    logger: Arc<dyn SimulationEventLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<E: RateEstimator + 'static, S: SimulationStore + 'static> RunSimulationUseCase<E, S> {
    pub fn new(estimator: Arc<E>, store: Arc<S>) -> Self {
        Self {
            estimator,
            store,
            behavior: BehaviorConfig::default(),
            logger: Arc::new(NoSimulationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the audit trail logger
    pub fn with_logger(mut self, logger: Arc<dyn SimulationEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token; a cancelled run discards partial results
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunSimulationInput,
    ) -> Result<RunSimulationOutput, RunSimulationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunSimulationInput,
        progress: &dyn SimulationProgressNotifier,
    ) -> Result<RunSimulationOutput, RunSimulationError> {
        let total = input.validate()?;
        self.check_cancelled()?;

        let questions: Vec<Question> = input
            .questionnaire
            .unique_questions()
            .into_iter()
            .cloned()
            .collect();

        info!(
            "Starting {} simulation: {} questions, {} persona groups, {} respondents",
            input.mode,
            questions.len(),
            input.groups.len(),
            total
        );
        self.logger.log(SimulationEvent::new(
            "simulation_started",
            json!({
                "mode": input.mode,
                "questions": questions.len(),
                "persona_groups": input.groups.iter().map(|g| g.allocation()).collect::<Vec<_>>(),
                "sample_size": total,
                "estimator": self.estimator.name(),
            }),
        ));
        progress.on_simulation_start(questions.len(), input.groups.len());

        let outcomes = self
            .allocate_all(&input, &questions, progress)
            .await?;

        let mut distributions = QuestionDistributions::new();
        let mut metadata = SimulationMetadata {
            mode: input.mode,
            persona_groups: input.groups.iter().map(|g| g.allocation()).collect(),
            narrative: input.narrative.clone(),
            ..Default::default()
        };

        for (question, outcome) in questions.iter().zip(outcomes) {
            let distribution = outcome.distribution?;
            if !outcome.fallbacks.is_empty() {
                metadata.record_fallback(question.text());
            }
            distributions.insert(question.text(), distribution);
        }

        let result = SimulationResult::new(total, distributions, metadata);
        result.verify()?;
        progress.on_simulation_complete();

        self.check_cancelled()?;
        let record_id = self.store.save(&result).await?;
        info!("Simulation saved as record {}", record_id);
        self.logger.log(SimulationEvent::new(
            "simulation_saved",
            json!({
                "record_id": record_id,
                "used_fallback": result.metadata.used_fallback,
                "fallback_questions": result.metadata.fallback_questions,
            }),
        ));

        let grouped = group_by_section(&input.questionnaire, &result.distributions);

        Ok(RunSimulationOutput {
            record_id,
            result,
            grouped,
        })
    }

    /// Allocate every question concurrently; outcomes come back in the
    /// order of `questions`.
    async fn allocate_all(
        &self,
        input: &RunSimulationInput,
        questions: &[Question],
        progress: &dyn SimulationProgressNotifier,
    ) -> Result<Vec<QuestionOutcome>, RunSimulationError> {
        let semaphore = Arc::new(Semaphore::new(self.behavior.max_concurrency.max(1)));
        let groups = Arc::new(input.groups.clone());
        let objective: Arc<str> = Arc::from(input.questionnaire.research_objective.as_str());
        let mut join_set = JoinSet::new();

        for (index, question) in questions.iter().enumerate() {
            let estimator = Arc::clone(&self.estimator);
            let semaphore = Arc::clone(&semaphore);
            let groups = Arc::clone(&groups);
            let objective = Arc::clone(&objective);
            let question = question.clone();
            let behavior = self.behavior.clone();
            let mode = input.mode;

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome =
                    Self::allocate_question(&estimator, &behavior, &objective, &groups, &question, mode)
                        .await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<QuestionOutcome>> = (0..questions.len()).map(|_| None).collect();

        loop {
            let joined = match &self.cancellation_token {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        warn!("Simulation cancelled; discarding partial results");
                        return Err(RunSimulationError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                },
                None => join_set.join_next().await,
            };

            let Some(joined) = joined else {
                break;
            };

            let (index, outcome) =
                joined.map_err(|e| RunSimulationError::TaskFailed(e.to_string()))?;
            let question = questions[index].text();

            for (group_id, entry) in &outcome.discarded {
                debug!(
                    "Discarded estimate entry '{}' from group {} on '{}': {}",
                    entry.option, group_id, question, entry.reason
                );
            }
            for record in &outcome.fallbacks {
                warn!(
                    "Using fallback for group {} on '{}': {}",
                    record.group_id, question, record.reason
                );
                progress.on_estimate_fallback(&record.group_id, question, &record.reason);
                self.logger.log(SimulationEvent::new(
                    "estimate_fallback",
                    json!({
                        "question": question,
                        "persona_group": record.group_id,
                        "reason": record.reason,
                    }),
                ));
            }

            if let Ok(distribution) = &outcome.distribution {
                self.logger.log(SimulationEvent::new(
                    "question_allocated",
                    json!({
                        "question": question,
                        "sample_size": distribution.sample_size(),
                        "distribution": distribution,
                        "used_fallback": !outcome.fallbacks.is_empty(),
                    }),
                ));
            }
            progress.on_question_complete(question, !outcome.fallbacks.is_empty());

            slots[index] = Some(outcome);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    RunSimulationError::TaskFailed(format!(
                        "no outcome for question '{}'",
                        questions[index].text()
                    ))
                })
            })
            .collect()
    }

    /// Allocate one question across all groups
    async fn allocate_question(
        estimator: &E,
        behavior: &BehaviorConfig,
        objective: &str,
        groups: &[PersonaGroup],
        question: &Question,
        mode: SimulationMode,
    ) -> QuestionOutcome {
        let total: u64 = groups.iter().map(|g| g.sample_size).sum();

        if question.is_free_text() {
            return QuestionOutcome {
                distribution: normalize(&RawEstimate::new(), total),
                fallbacks: Vec::new(),
                discarded: Vec::new(),
            };
        }

        let mut fallbacks = Vec::new();
        let mut discarded = Vec::new();
        let mut contributions = Vec::with_capacity(groups.len());

        for group in groups {
            let request = EstimateRequest::new(objective, group, question);
            match Self::estimate_group(estimator, behavior, &request, question).await {
                GroupEstimateOutcome::Usable {
                    estimate,
                    discarded: dropped,
                } => {
                    discarded.extend(dropped.into_iter().map(|d| (group.id.clone(), d)));
                    contributions.push(GroupContribution::raw(estimate, group.sample_size));
                }
                GroupEstimateOutcome::Fallback {
                    reason,
                    discarded: dropped,
                } => {
                    discarded.extend(dropped.into_iter().map(|d| (group.id.clone(), d)));
                    fallbacks.push(FallbackRecord {
                        group_id: group.id.clone(),
                        reason,
                    });
                    contributions.push(GroupContribution::failed(group.sample_size));
                }
            }
        }

        let distribution = match mode {
            SimulationMode::Single => {
                let estimate = match contributions.pop().and_then(|c| c.estimate) {
                    Some(GroupEstimate::Raw(raw)) => raw,
                    _ => fallback(question),
                };
                normalize(&estimate, total)
            }
            SimulationMode::Combined => combine(question, &contributions),
        };

        QuestionOutcome {
            distribution,
            fallbacks,
            discarded,
        }
    }

    /// Ask the estimator for one group, applying the timeout and reconciling
    /// the answer against the question.
    async fn estimate_group(
        estimator: &E,
        behavior: &BehaviorConfig,
        request: &EstimateRequest,
        question: &Question,
    ) -> GroupEstimateOutcome {
        let call = estimator.estimate(request);
        let result = match behavior.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(EstimatorError::Timeout)),
            None => call.await,
        };

        match result {
            Ok(raw) => {
                let reconciled = raw.reconcile(question);
                match reconciled.estimate {
                    Some(estimate) => GroupEstimateOutcome::Usable {
                        estimate,
                        discarded: reconciled.discarded,
                    },
                    None => GroupEstimateOutcome::Fallback {
                        reason: EstimatorError::Malformed(
                            "no entry matched a declared option".to_string(),
                        )
                        .to_string(),
                        discarded: reconciled.discarded,
                    },
                }
            }
            Err(e) => GroupEstimateOutcome::Fallback {
                reason: e.to_string(),
                discarded: Vec::new(),
            },
        }
    }

    fn check_cancelled(&self) -> Result<(), RunSimulationError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(RunSimulationError::Cancelled);
        }
        Ok(())
    }
}
