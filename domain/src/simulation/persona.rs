//! Persona groups and their sample sizes

use crate::allocation::apportion;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A synthetic respondent archetype with its sub-sample
///
/// `profile` is an opaque structured description handed to the rate
/// estimator; the allocation core never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaGroup {
    pub id: String,
    #[serde(default)]
    pub profile: serde_json::Value,
    /// Number of respondents this group represents
    #[serde(default)]
    pub sample_size: u64,
    /// Relative weight used when splitting a total sample across groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl PersonaGroup {
    pub fn new(id: impl Into<String>, sample_size: u64) -> Self {
        Self {
            id: id.into(),
            profile: serde_json::Value::Null,
            sample_size,
            weight: None,
        }
    }

    pub fn with_profile(mut self, profile: serde_json::Value) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn allocation(&self) -> PersonaGroupAllocation {
        PersonaGroupAllocation {
            persona_group_id: self.id.clone(),
            sample_size: self.sample_size,
        }
    }
}

/// `(persona_group_id, sample_size)` pair recorded with every result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaGroupAllocation {
    pub persona_group_id: String,
    pub sample_size: u64,
}

/// Split `total` respondents across groups in proportion to their weights.
///
/// Groups without a weight count as weight 1. Uses the same largest-remainder
/// apportionment as question allocation, so sizes always sum to `total` and
/// ties go to earlier groups.
pub fn split_sample(groups: &mut [PersonaGroup], total: u64) -> Result<(), DomainError> {
    if total == 0 {
        return Err(DomainError::ZeroSampleSize("total sample".to_string()));
    }

    let mut weights = Vec::with_capacity(groups.len());
    for group in groups.iter() {
        let weight = group.weight.unwrap_or(1.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(DomainError::InvalidEstimate {
                option: group.id.clone(),
                reason: format!("invalid group weight {}", weight),
            });
        }
        weights.push(weight);
    }

    for (group, size) in groups.iter_mut().zip(apportion(&weights, total)) {
        group.sample_size = size;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sample_by_weight() {
        let mut groups = vec![
            PersonaGroup::new("a", 0).with_weight(2.0),
            PersonaGroup::new("b", 0).with_weight(1.0),
        ];
        split_sample(&mut groups, 100).unwrap();
        assert_eq!(groups[0].sample_size, 67);
        assert_eq!(groups[1].sample_size, 33);
    }

    #[test]
    fn test_split_sample_default_weights() {
        let mut groups = vec![
            PersonaGroup::new("a", 0),
            PersonaGroup::new("b", 0),
            PersonaGroup::new("c", 0),
        ];
        split_sample(&mut groups, 10).unwrap();
        let sizes: Vec<_> = groups.iter().map(|g| g.sample_size).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn test_split_sample_rejects_zero_total() {
        let mut groups = vec![PersonaGroup::new("a", 0)];
        assert!(split_sample(&mut groups, 0).is_err());
    }

    #[test]
    fn test_split_sample_rejects_negative_weight() {
        let mut groups = vec![PersonaGroup::new("a", 0).with_weight(-1.0)];
        assert!(matches!(
            split_sample(&mut groups, 10),
            Err(DomainError::InvalidEstimate { .. })
        ));
    }

    #[test]
    fn test_deserialize_group() {
        let group: PersonaGroup = serde_json::from_str(
            r#"{"id": "urban-commuters", "profile": {"age": "25-34"}, "sample_size": 40}"#,
        )
        .unwrap();
        assert_eq!(group.sample_size, 40);
        assert_eq!(group.profile["age"], "25-34");
        assert_eq!(
            group.allocation(),
            PersonaGroupAllocation {
                persona_group_id: "urban-commuters".to_string(),
                sample_size: 40,
            }
        );
    }
}
