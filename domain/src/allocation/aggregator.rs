//! Aggregator: size-weighted combination of several persona groups.
//!
//! Each group contributes `share_g(o) * size_g` to option `o`. The combined
//! weights are then apportioned by [`normalize`] over `Σ size_g`, so the
//! combined distribution obeys exactly the same invariants as a
//! single-group one.

use super::distribution::Distribution;
use super::estimate::RawEstimate;
use super::fallback::fallback;
use super::normalizer::{normalize, validate_weights};
use crate::core::error::DomainError;
use crate::survey::Question;

/// What a group knows about one question
#[derive(Debug, Clone, PartialEq)]
pub enum GroupEstimate {
    /// Unnormalized weights; shares are `weight / Σweight`
    Raw(RawEstimate),
    /// Already apportioned; shares are `count / sample_size`
    Normalized(Distribution),
}

impl GroupEstimate {
    /// Option labels in this estimate's order
    fn options(&self) -> Vec<&str> {
        match self {
            GroupEstimate::Raw(raw) => raw.options().collect(),
            GroupEstimate::Normalized(dist) => {
                dist.entries().iter().map(|e| e.option.as_str()).collect()
            }
        }
    }

    /// Fractional share of each option (sums to 1 over this estimate)
    fn shares(&self) -> Result<Vec<(&str, f64)>, DomainError> {
        match self {
            GroupEstimate::Raw(raw) => {
                validate_weights(raw)?;
                let total: f64 = raw.entries().iter().map(|(_, w)| w).sum();
                let n = raw.len() as f64;
                Ok(raw
                    .entries()
                    .iter()
                    .map(|(o, w)| {
                        let share = if total > 0.0 { w / total } else { 1.0 / n };
                        (o.as_str(), share)
                    })
                    .collect())
            }
            GroupEstimate::Normalized(dist) => Ok(dist
                .entries()
                .iter()
                .map(|e| (e.option.as_str(), e.count as f64 / dist.sample_size() as f64))
                .collect()),
        }
    }
}

/// One persona group's input to [`combine`]
#[derive(Debug, Clone, PartialEq)]
pub struct GroupContribution {
    /// `None` when the group produced nothing usable
    pub estimate: Option<GroupEstimate>,
    pub sample_size: u64,
}

impl GroupContribution {
    pub fn raw(estimate: RawEstimate, sample_size: u64) -> Self {
        Self {
            estimate: Some(GroupEstimate::Raw(estimate)),
            sample_size,
        }
    }

    pub fn normalized(distribution: Distribution, sample_size: u64) -> Self {
        Self {
            estimate: Some(GroupEstimate::Normalized(distribution)),
            sample_size,
        }
    }

    pub fn failed(sample_size: u64) -> Self {
        Self {
            estimate: None,
            sample_size,
        }
    }
}

/// Combine groups into one distribution over `Σ sample_size`.
///
/// - Groups of size 0 are ignored.
/// - Options missing from a group count as weight 0 for that group.
/// - A failed group (or one with an empty estimate) contributes the
///   [`fallback`] estimate for the question.
/// - If every group failed, the result is the even split of the fallback
///   estimate over the combined size.
///
/// Option order: the question's allocation options first, then any other
/// labels in order of first appearance across groups.
///
/// # Example
///
/// ```
/// use survey_domain::allocation::{combine, Distribution, GroupContribution};
/// use survey_domain::survey::Question;
///
/// let q = Question::new("Q", ["Yes", "No"]);
/// let a = Distribution::from_counts([("Yes", 70), ("No", 30)]).unwrap();
/// let b = Distribution::from_counts([("Yes", 10), ("No", 40)]).unwrap();
/// let combined = combine(
///     &q,
///     &[GroupContribution::normalized(a, 100), GroupContribution::normalized(b, 50)],
/// )
/// .unwrap();
/// assert_eq!(combined.sample_size(), 150);
/// assert_eq!(combined.counts(), vec![80, 70]);
/// ```
pub fn combine(
    question: &Question,
    groups: &[GroupContribution],
) -> Result<Distribution, DomainError> {
    let active: Vec<&GroupContribution> = groups.iter().filter(|g| g.sample_size > 0).collect();
    let total: u64 = active.iter().map(|g| g.sample_size).sum();
    if total == 0 {
        return Err(DomainError::ZeroSampleSize(format!(
            "combined groups of '{}'",
            question.text()
        )));
    }

    let uniform = GroupEstimate::Raw(fallback(question));
    let resolved: Vec<(&GroupEstimate, u64)> = active
        .iter()
        .map(|g| {
            let estimate = match &g.estimate {
                Some(GroupEstimate::Raw(raw)) if raw.is_empty() => &uniform,
                Some(estimate) => estimate,
                None => &uniform,
            };
            (estimate, g.sample_size)
        })
        .collect();

    if active.iter().all(|g| g.estimate.is_none()) {
        return normalize(&fallback(question), total);
    }

    let mut options: Vec<String> = question.allocation_options();
    for (estimate, _) in &resolved {
        for option in estimate.options() {
            if !options.iter().any(|o| o == option) {
                options.push(option.to_string());
            }
        }
    }

    let mut weights = vec![0.0_f64; options.len()];
    for (estimate, size) in &resolved {
        for (option, share) in estimate.shares()? {
            if let Some(idx) = options.iter().position(|o| o == option) {
                weights[idx] += share * *size as f64;
            }
        }
    }

    normalize(&RawEstimate::from_entries(options.into_iter().zip(weights)), total)
}
