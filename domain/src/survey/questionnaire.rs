//! Questionnaire and Section entities

use super::question::Question;
use serde::{Deserialize, Serialize};

/// A named, ordered grouping of questions
///
/// Purely organizational: allocation never looks at sections, only the
/// display grouping does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            questions,
        }
    }
}

/// A complete questionnaire: research objective plus ordered sections
///
/// # Example
///
/// ```
/// use survey_domain::survey::{Question, Questionnaire, Section};
///
/// let questionnaire = Questionnaire::new(
///     "Understand commuting habits",
///     vec![Section::new(
///         "Transport",
///         vec![Question::new("Do you own a car?", ["Yes", "No"])],
///     )],
/// );
/// assert_eq!(questionnaire.question_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Questionnaire {
    #[serde(default)]
    pub research_objective: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Questionnaire {
    pub fn new(research_objective: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            research_objective: research_objective.into(),
            sections,
        }
    }

    /// All questions across sections, in declared order
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Questions in declared order with repeated texts removed (first wins)
    ///
    /// Question text is the join key, so a repeated text can only ever carry
    /// one distribution.
    pub fn unique_questions(&self) -> Vec<&Question> {
        let mut seen = std::collections::HashSet::new();
        self.questions()
            .filter(|q| seen.insert(q.text()))
            .collect()
    }

    /// Number of questions (including repeats)
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Whether the questionnaire has no questions at all
    pub fn is_empty(&self) -> bool {
        self.question_count() == 0
    }

    /// Look up a question by its exact text (first declaration wins)
    pub fn question(&self, text: &str) -> Option<&Question> {
        self.questions().find(|q| q.text() == text)
    }
}
