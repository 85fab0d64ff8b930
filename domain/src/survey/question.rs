//! Question value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Label of the synthetic option given to questions without declared options
/// (e.g. free-text questions).
pub const NO_OPTION_PROVIDED: &str = "No option provided";

/// A survey question (Value Object)
///
/// Identified by its exact text. Options are kept in declared order since
/// that order carries meaning for respondents and report readers. Duplicate
/// option labels are dropped (first occurrence wins) because options are
/// keyed by label in every serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    text: String,
    options: Vec<String>,
}

/// Serialized form: `{"question": "...", "options": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestionRecord {
    question: String,
    #[serde(default)]
    options: Vec<String>,
}

impl Question {
    /// Create a new question
    ///
    /// # Panics
    /// Panics if the text is empty or only whitespace
    pub fn new<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let text = text.into();
        assert!(!text.trim().is_empty(), "Question text cannot be empty");
        Self::build(text, options)
    }

    /// Try to create a new question, returning None if the text is empty
    pub fn try_new<I, S>(text: impl Into<String>, options: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self::build(text, options))
        }
    }

    fn build<I, S>(text: String, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut declared: Vec<String> = Vec::new();
        for option in options {
            let option = option.into();
            if !declared.contains(&option) {
                declared.push(option);
            }
        }

        Self {
            text,
            options: declared,
        }
    }

    /// Create a free-text question (no selectable options)
    pub fn free_text(text: impl Into<String>) -> Self {
        Self::new(text, Vec::<String>::new())
    }

    /// The question text (join key)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Declared options, in order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Whether this question has no declared options
    pub fn is_free_text(&self) -> bool {
        self.options.is_empty()
    }

    /// Options used for allocation: the declared options, or the single
    /// synthetic [`NO_OPTION_PROVIDED`] entry for free-text questions.
    pub fn allocation_options(&self) -> Vec<String> {
        if self.options.is_empty() {
            vec![NO_OPTION_PROVIDED.to_string()]
        } else {
            self.options.clone()
        }
    }

    /// Index of a declared option by exact label
    pub fn option_index(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o == label)
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = DomainError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::try_new(record.question, record.options)
            .ok_or_else(|| DomainError::InvalidQuestion("question text is empty".to_string()))
    }
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        Self {
            question: q.text,
            options: q.options,
        }
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
