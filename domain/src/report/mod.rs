//! Display-ready reshaping of simulation results.

pub mod grouper;

pub use grouper::{OptionResult, QuestionResults, SectionResults, group_by_section};
