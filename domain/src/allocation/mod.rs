//! Sample allocation core
//!
//! Turns fractional response-rate estimates into exact integer respondent
//! counts per option.
//!
//! # Flow
//!
//! ```text
//!  estimator output ──► parse_rate_estimate ──► RawEstimate::reconcile
//!                                                      │
//!                        (nothing usable) ─► fallback ─┤
//!                                                      ▼
//!  single group:                                   normalize ──► Distribution
//!  several groups:  GroupContribution[] ──► combine ──► normalize ──► Distribution
//! ```
//!
//! Everything here is pure and deterministic: same input, same counts.

pub mod aggregator;
pub mod distribution;
pub mod estimate;
pub mod fallback;
pub mod normalizer;
pub mod parsing;

pub use aggregator::{GroupContribution, GroupEstimate, combine};
pub use distribution::{
    Distribution, DistributionEntry, format_percentage, percentage_of, round_percentage,
};
pub use estimate::{DiscardReason, DiscardedEntry, RawEstimate, Reconciled};
pub use fallback::fallback;
pub use normalizer::{apportion, even_split, normalize};
pub use parsing::{coerce_weight, parse_rate_estimate};

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::survey::Question;
    use proptest::prelude::*;

    fn arb_weights() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(
            prop_oneof![
                Just(0.0),
                0.0f64..1.0,
                0.0f64..1000.0,
                0.0f64..f64::MAX / 16.0,
            ],
            1..12,
        )
    }

    fn arb_sample_size() -> impl Strategy<Value = u64> {
        prop_oneof![1u64..5000, 1u64..(1u64 << 40)]
    }

    fn estimate_from(weights: &[f64]) -> RawEstimate {
        RawEstimate::from_entries(
            weights
                .iter()
                .enumerate()
                .map(|(i, w)| (format!("option-{i}"), *w)),
        )
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_sample_size(weights in arb_weights(), n in arb_sample_size()) {
            let d = normalize(&estimate_from(&weights), n).unwrap();
            prop_assert_eq!(d.counts().iter().sum::<u64>(), n);
            prop_assert_eq!(d.sample_size(), n);
            prop_assert_eq!(d.entries().len(), weights.len());
        }

        #[test]
        fn prop_percentages_derive_from_counts(weights in arb_weights(), n in arb_sample_size()) {
            let d = normalize(&estimate_from(&weights), n).unwrap();
            for entry in d.entries() {
                prop_assert_eq!(entry.percentage, percentage_of(entry.count, n));
            }
            prop_assert!(d.verify().is_ok());
        }

        #[test]
        fn prop_normalize_is_deterministic(weights in arb_weights(), n in arb_sample_size()) {
            let estimate = estimate_from(&weights);
            prop_assert_eq!(normalize(&estimate, n).unwrap(), normalize(&estimate, n).unwrap());
        }

        #[test]
        fn prop_counts_within_one_of_exact_share(weights in arb_weights(), n in arb_sample_size()) {
            let total: f64 = weights.iter().sum();
            prop_assume!(total > 0.0);
            let d = normalize(&estimate_from(&weights), n).unwrap();
            for (count, w) in d.counts().iter().zip(&weights) {
                let exact = w / total * n as f64;
                prop_assert!((*count as f64 - exact).abs() < 1.0 + exact * 1e-9);
            }
        }

        #[test]
        fn prop_larger_remainder_wins_the_spare_unit(base in 1.0f64..1e6, delta in 1e-12f64..1e-6) {
            let d = normalize(&estimate_from(&[base, base * (1.0 + delta)]), 1).unwrap();
            prop_assert_eq!(d.counts(), vec![0, 1]);
        }

        #[test]
        fn prop_fallback_equals_uniform(options in 1usize..10, n in 1u64..2000) {
            let labels: Vec<String> = (0..options).map(|i| format!("o{i}")).collect();
            let q = Question::new("Q", labels.clone());
            let via_fallback = normalize(&fallback(&q), n).unwrap();
            let via_uniform = normalize(&RawEstimate::uniform(labels.clone()), n).unwrap();
            let via_zero = normalize(&RawEstimate::from_entries(labels.into_iter().map(|l| (l, 0.0))), n).unwrap();
            prop_assert_eq!(&via_fallback, &via_uniform);
            prop_assert_eq!(&via_fallback, &via_zero);
        }

        #[test]
        fn prop_combine_conserves_sample_size(
            groups in prop::collection::vec((arb_weights(), 0u64..500), 1..6),
        ) {
            let q = Question::new("Q", (0..12).map(|i| format!("option-{i}")));
            let contributions: Vec<GroupContribution> = groups
                .iter()
                .map(|(w, size)| GroupContribution::raw(estimate_from(w), *size))
                .collect();
            let total: u64 = groups.iter().map(|(_, size)| size).sum();

            match combine(&q, &contributions) {
                Ok(d) => {
                    prop_assert_eq!(d.sample_size(), total);
                    prop_assert_eq!(d.counts().iter().sum::<u64>(), total);
                    prop_assert!(d.verify().is_ok());
                }
                Err(_) => prop_assert_eq!(total, 0),
            }
        }
    }
}
