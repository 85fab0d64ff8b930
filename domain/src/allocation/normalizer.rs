//! Normalizer: exact-sum integer apportionment of a raw estimate.
//!
//! Uses the largest-remainder (Hamilton) method:
//!
//! 1. Each option's exact share is `weight / Σweight * sample_size`.
//! 2. Every option receives the floor of its share.
//! 3. The units left over go one each to the options with the largest
//!    fractional remainders; equal remainders are resolved by declared order.
//!
//! When all weights are zero the sample is split evenly, the first
//! `sample_size % n` options receiving one extra unit.

use super::distribution::Distribution;
use super::estimate::RawEstimate;
use crate::core::error::DomainError;
use crate::survey::NO_OPTION_PROVIDED;

/// Even split of `total` across `n` slots; earlier slots take the extra units.
pub fn even_split(n: usize, total: u64) -> Vec<u64> {
    if n == 0 {
        return Vec::new();
    }
    let base = total / n as u64;
    let remainder = (total - base * n as u64) as usize;
    (0..n)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Apportion `total` units across `weights` with the largest-remainder method.
///
/// Weights must be finite and non-negative. The result always sums to
/// `total` and has one entry per weight. All-zero weights give an
/// [`even_split`].
pub fn apportion(weights: &[f64], total: u64) -> Vec<u64> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return even_split(n, total);
    }

    // Divide first: `w / Σw` is at most 1, so the share never overflows.
    let shares: Vec<f64> = weights
        .iter()
        .map(|w| w / weight_sum * total as f64)
        .collect();
    let mut counts: Vec<u64> = shares
        .iter()
        .map(|s| (s.floor() as u64).min(total))
        .collect();
    let fractions: Vec<f64> = shares.iter().map(|s| s - s.floor()).collect();

    // Stable sort: only exactly equal remainders keep declared order.
    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| fractions[b].total_cmp(&fractions[a]));

    let assigned = counts
        .iter()
        .fold(0u128, |acc, &c| acc + u128::from(c));
    let target = u128::from(total);

    if assigned <= target {
        let remainder = (target - assigned) as usize;
        for &i in ranked.iter().cycle().take(remainder) {
            counts[i] += 1;
        }
    } else {
        // Float rounding on very large totals can push the floors past the
        // total; take the surplus back from the smallest remainders.
        let mut surplus = assigned - target;
        for &i in ranked.iter().rev().cycle() {
            if surplus == 0 {
                break;
            }
            let take = surplus.min(u128::from(counts[i]).min(1)) as u64;
            counts[i] -= take;
            surplus -= u128::from(take);
        }
    }

    counts
}

/// Check that every weight in an estimate is usable.
pub fn validate_weights(estimate: &RawEstimate) -> Result<(), DomainError> {
    for (option, weight) in estimate.entries() {
        if !weight.is_finite() {
            return Err(DomainError::InvalidEstimate {
                option: option.clone(),
                reason: format!("non-finite weight {}", weight),
            });
        }
        if *weight < 0.0 {
            return Err(DomainError::InvalidEstimate {
                option: option.clone(),
                reason: format!("negative weight {}", weight),
            });
        }
    }
    let total: f64 = estimate.entries().iter().map(|(_, w)| w).sum();
    if !total.is_finite() {
        return Err(DomainError::InvalidEstimate {
            option: "*".to_string(),
            reason: "weights overflow when summed".to_string(),
        });
    }
    Ok(())
}

/// Convert a raw estimate into an exact-sum [`Distribution`].
///
/// An empty estimate yields a single [`NO_OPTION_PROVIDED`] entry holding
/// the whole sample. Negative or non-finite weights are rejected with
/// [`DomainError::InvalidEstimate`]; reconcile estimates first to drop them
/// instead.
///
/// # Example
///
/// ```
/// use survey_domain::allocation::{normalize, RawEstimate};
///
/// let estimate = RawEstimate::from_entries([("A", 0.5), ("B", 0.3), ("C", 0.2)]);
/// let distribution = normalize(&estimate, 7).unwrap();
/// assert_eq!(distribution.counts(), vec![4, 2, 1]);
/// ```
pub fn normalize(estimate: &RawEstimate, sample_size: u64) -> Result<Distribution, DomainError> {
    if sample_size == 0 {
        return Err(DomainError::ZeroSampleSize("normalization".to_string()));
    }

    if estimate.is_empty() {
        return Distribution::from_counts([(NO_OPTION_PROVIDED, sample_size)]);
    }

    validate_weights(estimate)?;

    let weights: Vec<f64> = estimate.entries().iter().map(|(_, w)| *w).collect();
    let counts = apportion(&weights, sample_size);

    Distribution::from_counts(
        estimate
            .options()
            .zip(counts)
            .map(|(option, count)| (option.to_string(), count)),
    )
}
