//! Simulation result: per-question distributions plus metadata.

use super::persona::PersonaGroupAllocation;
use crate::allocation::Distribution;
use crate::core::error::DomainError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// How groups were simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// One persona group, normalized directly
    #[default]
    Single,
    /// Several persona groups, aggregated by sample size
    Combined,
}

impl std::fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationMode::Single => write!(f, "single"),
            SimulationMode::Combined => write!(f, "combined"),
        }
    }
}

/// Ordered map from question text to its distribution
///
/// Serializes to the wire shape `{"<question>": {"<option>": {"count", "pct"}}}`
/// in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct QuestionDistributions {
    entries: Vec<(String, Distribution)>,
}

impl QuestionDistributions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a distribution; an existing entry for the same question is
    /// replaced in place.
    pub fn insert(&mut self, question: impl Into<String>, distribution: Distribution) {
        let question = question.into();
        match self.entries.iter_mut().find(|(q, _)| *q == question) {
            Some((_, existing)) => *existing = distribution,
            None => self.entries.push((question, distribution)),
        }
    }

    pub fn get(&self, question: &str) -> Option<&Distribution> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Distribution)> {
        self.entries.iter().map(|(q, d)| (q.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Distribution)> for QuestionDistributions {
    fn from_iter<T: IntoIterator<Item = (String, Distribution)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (question, distribution) in iter {
            map.insert(question, distribution);
        }
        map
    }
}

impl Serialize for QuestionDistributions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (question, distribution) in &self.entries {
            map.serialize_entry(question, distribution)?;
        }
        map.end()
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for QuestionDistributions {
    type Error = DomainError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut distributions = Self::new();
        for (question, value) in map {
            let distribution: Distribution = serde_json::from_value(value).map_err(|e| {
                DomainError::InconsistentDistribution(format!("question '{}': {}", question, e))
            })?;
            distributions.insert(question, distribution);
        }
        Ok(distributions)
    }
}

/// Metadata carried alongside the distributions
///
/// `narrative` is opaque to the allocation core and passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub mode: SimulationMode,
    pub used_fallback: bool,
    /// Question texts whose distribution (or part of it) came from the fallback
    #[serde(default)]
    pub fallback_questions: Vec<String>,
    #[serde(default)]
    pub persona_groups: Vec<PersonaGroupAllocation>,
    #[serde(default)]
    pub narrative: serde_json::Value,
}

impl SimulationMetadata {
    /// Record that a question fell back to the uniform estimate
    pub fn record_fallback(&mut self, question: &str) {
        self.used_fallback = true;
        if !self.fallback_questions.iter().any(|q| q == question) {
            self.fallback_questions.push(question.to_string());
        }
    }
}

/// Full output of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub sample_size: u64,
    pub distributions: QuestionDistributions,
    #[serde(default)]
    pub metadata: SimulationMetadata,
}

impl SimulationResult {
    pub fn new(
        sample_size: u64,
        distributions: QuestionDistributions,
        metadata: SimulationMetadata,
    ) -> Self {
        Self {
            sample_size,
            distributions,
            metadata,
        }
    }

    /// Check every distribution against its own invariants and the total
    /// sample size.
    pub fn verify(&self) -> Result<(), DomainError> {
        for (question, distribution) in self.distributions.iter() {
            distribution.verify()?;
            if distribution.sample_size() != self.sample_size {
                return Err(DomainError::InconsistentDistribution(format!(
                    "question '{}' allocates {} respondents but the simulation has {}",
                    question,
                    distribution.sample_size(),
                    self.sample_size
                )));
            }
        }
        Ok(())
    }

    /// The persisted wire form of the distributions
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::to_value(&self.distributions).unwrap_or(serde_json::Value::Null)
    }

    /// Rebuild a result from its wire form. The sample size is taken from
    /// the distributions, which must all agree; metadata starts empty.
    pub fn from_wire(wire: serde_json::Value) -> Result<Self, DomainError> {
        let serde_json::Value::Object(map) = wire else {
            return Err(DomainError::InconsistentDistribution(
                "wire form must be an object keyed by question".to_string(),
            ));
        };
        let distributions = QuestionDistributions::try_from(map)?;
        let sample_size = distributions
            .iter()
            .map(|(_, d)| d.sample_size())
            .next()
            .ok_or(DomainError::EmptyQuestionSet)?;

        let result = Self::new(sample_size, distributions, SimulationMetadata::default());
        result.verify()?;
        Ok(result)
    }
}
