//! RawEstimate value object and reconciliation against a question

use crate::survey::Question;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// An unnormalized response-rate proposal for one question
///
/// Ordered `(option, weight)` pairs. Weights are relative proportions and
/// need not sum to anything in particular; they may be fractions or rough
/// counts. Order is significant: it is the tie-break order used by the
/// normalizer when no declared option order exists.
///
/// Serializes as a JSON object `{"<option>": <weight>, ...}` in entry order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct RawEstimate {
    entries: Vec<(String, f64)>,
}

impl RawEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered `(option, weight)` pairs
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(o, w)| (o.into(), w)).collect(),
        }
    }

    /// Weight 1.0 for every option, in the given order
    pub fn uniform<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_entries(options.into_iter().map(|o| (o, 1.0)))
    }

    /// Append an entry (builder style)
    pub fn with_weight(mut self, option: impl Into<String>, weight: f64) -> Self {
        self.entries.push((option.into(), weight));
        self
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of the first entry with this exact label
    pub fn weight(&self, option: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(o, _)| o == option)
            .map(|(_, w)| *w)
    }

    /// Option labels in entry order
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(o, _)| o.as_str())
    }

    /// Validate an estimate against a question's declared options
    ///
    /// Keeps entries whose label matches a declared option (exact match,
    /// then trimmed case-insensitive match), drops negative and non-finite
    /// weights, sums duplicate labels, and re-orders to declared order with
    /// missing options filled in at weight 0. For questions without declared
    /// options, valid entries are kept in their own order.
    ///
    /// `estimate` is `None` when no entry survived; callers then fall back
    /// to a uniform estimate.
    pub fn reconcile(&self, question: &Question) -> Reconciled {
        let mut discarded = Vec::new();
        let mut accepted: Vec<(String, f64)> = Vec::new();

        for (label, weight) in &self.entries {
            let weight = *weight;
            if !weight.is_finite() {
                discarded.push(DiscardedEntry::new(label, DiscardReason::NonFiniteWeight));
                continue;
            }
            if weight < 0.0 {
                discarded.push(DiscardedEntry::new(label, DiscardReason::NegativeWeight));
                continue;
            }

            let resolved = if question.is_free_text() {
                Some(label.clone())
            } else {
                match_declared_option(question, label).map(str::to_string)
            };

            let Some(option) = resolved else {
                discarded.push(DiscardedEntry::new(label, DiscardReason::UnknownOption));
                continue;
            };

            match accepted.iter_mut().find(|(o, _)| *o == option) {
                Some((_, existing)) => *existing += weight,
                None => accepted.push((option, weight)),
            }
        }

        if accepted.is_empty() {
            return Reconciled {
                estimate: None,
                discarded,
            };
        }

        let estimate = if question.is_free_text() {
            RawEstimate { entries: accepted }
        } else {
            RawEstimate::from_entries(question.options().iter().map(|declared| {
                let weight = accepted
                    .iter()
                    .find(|(o, _)| o == declared)
                    .map(|(_, w)| *w)
                    .unwrap_or(0.0);
                (declared.clone(), weight)
            }))
        };

        Reconciled {
            estimate: Some(estimate),
            discarded,
        }
    }
}

fn match_declared_option<'q>(question: &'q Question, label: &str) -> Option<&'q str> {
    if let Some(idx) = question.option_index(label) {
        return Some(question.options()[idx].as_str());
    }
    let wanted = label.trim().to_lowercase();
    question
        .options()
        .iter()
        .find(|o| o.trim().to_lowercase() == wanted)
        .map(String::as_str)
}

impl Serialize for RawEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (option, weight) in &self.entries {
            map.serialize_entry(option, weight)?;
        }
        map.end()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for RawEstimate {
    /// Values that cannot be read as a weight are dropped
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::from_entries(
            map.into_iter()
                .filter_map(|(k, v)| super::parsing::coerce_weight(&v).map(|w| (k, w))),
        )
    }
}

/// Why an estimate entry was dropped during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    UnknownOption,
    NegativeWeight,
    NonFiniteWeight,
}

impl std::fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscardReason::UnknownOption => write!(f, "option not declared by question"),
            DiscardReason::NegativeWeight => write!(f, "negative weight"),
            DiscardReason::NonFiniteWeight => write!(f, "non-finite weight"),
        }
    }
}

/// An estimate entry dropped during reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardedEntry {
    pub option: String,
    pub reason: DiscardReason,
}

impl DiscardedEntry {
    fn new(option: &str, reason: DiscardReason) -> Self {
        Self {
            option: option.to_string(),
            reason,
        }
    }
}

/// Result of [`RawEstimate::reconcile`]
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub estimate: Option<RawEstimate>,
    pub discarded: Vec<DiscardedEntry>,
}

impl Reconciled {
    /// Whether the estimate was usable at all
    pub fn is_usable(&self) -> bool {
        self.estimate.is_some()
    }
}
