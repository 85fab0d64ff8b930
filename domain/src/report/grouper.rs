//! Questionnaire grouper
//!
//! Reshapes the flat question → distribution map back into the
//! section → question hierarchy, with percentages rendered as strings:
//!
//! ```json
//! [{"title": "...", "questions": [
//!     {"question": "...", "results": [{"option": "...", "count": 3, "percentage": "37.5%"}]}
//! ]}]
//! ```

use crate::allocation::Distribution;
use crate::simulation::QuestionDistributions;
use crate::survey::Questionnaire;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionResult {
    pub option: String,
    pub count: u64,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResults {
    pub question: String,
    pub results: Vec<OptionResult>,
}

impl QuestionResults {
    fn from_distribution(question: &str, distribution: &Distribution) -> Self {
        Self {
            question: question.to_string(),
            results: distribution
                .entries()
                .iter()
                .map(|e| OptionResult {
                    option: e.option.clone(),
                    count: e.count,
                    percentage: e.percentage_label(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResults {
    pub title: String,
    pub questions: Vec<QuestionResults>,
}

/// Group distributions by the questionnaire's sections.
///
/// Sections and questions keep declared order. Questions without a
/// distribution (not simulated yet) are skipped; a section whose questions
/// were all skipped is still listed, with no questions.
pub fn group_by_section(
    questionnaire: &Questionnaire,
    distributions: &QuestionDistributions,
) -> Vec<SectionResults> {
    questionnaire
        .sections
        .iter()
        .map(|section| SectionResults {
            title: section.title.clone(),
            questions: section
                .questions
                .iter()
                .filter_map(|q| {
                    distributions
                        .get(q.text())
                        .map(|d| QuestionResults::from_distribution(q.text(), d))
                })
                .collect(),
        })
        .collect()
}
