//! Questionnaire structure: questions, sections and the questionnaire itself.
//!
//! Questions are identified by their exact text. That text is the join key
//! between estimates, distributions and the display hierarchy.

pub mod question;
pub mod questionnaire;

pub use question::{NO_OPTION_PROVIDED, Question};
pub use questionnaire::{Questionnaire, Section};
