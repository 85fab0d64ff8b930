//! Distribution value object: exact-sum integer counts per option.

use crate::core::error::DomainError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Round a percentage to one decimal place.
///
/// Rounds on the exact binary value with ties to even, which is what
/// report consumers reproduce when they re-derive percentages from counts.
pub fn round_percentage(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Percentage of `count` within `sample_size`, rounded to one decimal.
///
/// Zero when `sample_size` is zero.
pub fn percentage_of(count: u64, sample_size: u64) -> f64 {
    if sample_size == 0 {
        0.0
    } else {
        round_percentage(100.0 * count as f64 / sample_size as f64)
    }
}

/// Display form of a rounded percentage: `"35%"` when it has no fractional
/// part, otherwise one decimal (`"34.7%"`).
pub fn format_percentage(percentage: f64) -> String {
    let rounded = round_percentage(percentage);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}%")
    } else {
        format!("{rounded:.1}%")
    }
}

/// One option's share of a distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub option: String,
    pub count: u64,
    pub percentage: f64,
}

impl DistributionEntry {
    /// Display-ready percentage string
    pub fn percentage_label(&self) -> String {
        format_percentage(self.percentage)
    }
}

/// Finalized allocation for one question
///
/// Guarantees, checked on construction:
/// - counts sum exactly to `sample_size`
/// - every percentage equals `round(100 * count / sample_size, 1)`
/// - entries keep the order they were built in
///
/// Never mutated after creation.
///
/// Serializes to the persisted wire shape
/// `{"<option>": {"count": <int>, "pct": <float>}, ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct Distribution {
    sample_size: u64,
    entries: Vec<DistributionEntry>,
}

impl Distribution {
    /// Build from ordered `(option, count)` pairs; percentages are derived.
    pub fn from_counts<I, S>(counts: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let counts: Vec<(String, u64)> = counts.into_iter().map(|(o, c)| (o.into(), c)).collect();
        let sample_size: u64 = counts.iter().map(|(_, c)| *c).sum();
        if sample_size == 0 {
            return Err(DomainError::ZeroSampleSize("distribution".to_string()));
        }

        let entries = counts
            .into_iter()
            .map(|(option, count)| DistributionEntry {
                option,
                count,
                percentage: percentage_of(count, sample_size),
            })
            .collect();

        Ok(Self {
            sample_size,
            entries,
        })
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    pub fn entry(&self, option: &str) -> Option<&DistributionEntry> {
        self.entries.iter().find(|e| e.option == option)
    }

    pub fn count(&self, option: &str) -> Option<u64> {
        self.entry(option).map(|e| e.count)
    }

    /// Counts in entry order
    pub fn counts(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.count).collect()
    }

    /// Re-check both invariants. Used when a distribution arrives from
    /// outside (e.g. loaded from a store).
    pub fn verify(&self) -> Result<(), DomainError> {
        let total: u64 = self.entries.iter().map(|e| e.count).sum();
        if total != self.sample_size {
            return Err(DomainError::InconsistentDistribution(format!(
                "counts sum to {} but sample size is {}",
                total, self.sample_size
            )));
        }
        for entry in &self.entries {
            let expected = percentage_of(entry.count, self.sample_size);
            if (entry.percentage - expected).abs() > PERCENTAGE_TOLERANCE {
                return Err(DomainError::InconsistentDistribution(format!(
                    "option '{}' has percentage {} but {} was expected",
                    entry.option, entry.percentage, expected
                )));
            }
        }
        Ok(())
    }
}

/// Slack for percentages that went through a text round trip
const PERCENTAGE_TOLERANCE: f64 = 1e-9;

/// Persisted per-option record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireEntry {
    count: u64,
    pct: f64,
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(
                &entry.option,
                &WireEntry {
                    count: entry.count,
                    pct: entry.percentage,
                },
            )?;
        }
        map.end()
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Distribution {
    type Error = DomainError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(map.len());
        for (option, value) in map {
            let wire: WireEntry = serde_json::from_value(value).map_err(|e| {
                DomainError::InconsistentDistribution(format!("option '{}': {}", option, e))
            })?;
            entries.push(DistributionEntry {
                option,
                count: wire.count,
                percentage: wire.pct,
            });
        }

        let sample_size = entries.iter().map(|e| e.count).sum();
        if sample_size == 0 {
            return Err(DomainError::ZeroSampleSize("distribution".to_string()));
        }

        let mut distribution = Self {
            sample_size,
            entries,
        };
        distribution.verify()?;
        // Canonical values, independent of how the float was parsed
        for entry in &mut distribution.entries {
            entry.percentage = percentage_of(entry.count, sample_size);
        }
        Ok(distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_percentage_ties_to_even() {
        assert_eq!(round_percentage(33.333333), 33.3);
        assert_eq!(round_percentage(6.25), 6.2);
        assert_eq!(round_percentage(6.75), 6.8);
        // 0.05 is stored slightly above one half of the last place
        assert_eq!(round_percentage(0.05), 0.1);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(35.0), "35%");
        assert_eq!(format_percentage(34.7), "34.7%");
        assert_eq!(format_percentage(100.0), "100%");
        assert_eq!(format_percentage(0.0), "0%");
        assert_eq!(format_percentage(99.96), "100%");
        assert_eq!(format_percentage(12.04), "12%");
    }

    #[test]
    fn test_from_counts() {
        let d = Distribution::from_counts([("Yes", 2), ("No", 1)]).unwrap();
        assert_eq!(d.sample_size(), 3);
        assert_eq!(d.entries()[0].percentage, 66.7);
        assert_eq!(d.entries()[1].percentage, 33.3);
        assert_eq!(d.entries()[1].percentage_label(), "33.3%");
        assert!(d.verify().is_ok());
    }

    #[test]
    fn test_from_counts_all_zero_is_error() {
        let result = Distribution::from_counts([("Yes", 0u64), ("No", 0)]);
        assert!(matches!(result, Err(DomainError::ZeroSampleSize(_))));
    }

    #[test]
    fn test_wire_shape() {
        let d = Distribution::from_counts([("Yes", 3), ("No", 1)]).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(
            json,
            r#"{"Yes":{"count":3,"pct":75.0},"No":{"count":1,"pct":25.0}}"#
        );
    }

    #[test]
    fn test_wire_round_trip_keeps_order() {
        let d = Distribution::from_counts([("Z", 1), ("A", 2), ("M", 4)]).unwrap();
        let back: Distribution = serde_json::from_str(&serde_json::to_string(&d).unwrap()).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_wire_rejects_inconsistent_percentage() {
        let json = r#"{"Yes":{"count":3,"pct":70.0},"No":{"count":1,"pct":25.0}}"#;
        let result: Result<Distribution, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_rejects_missing_fields() {
        let json = r#"{"Yes":{"count":3}}"#;
        let result: Result<Distribution, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
