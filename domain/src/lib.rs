//! Domain layer for survey-sim
//!
//! This crate contains the sample allocation core: the deterministic numeric
//! layer that turns estimated response-rate distributions into exact integer
//! respondent counts. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Allocation
//!
//! - **Normalizer**: largest-remainder apportionment of one estimate onto a
//!   sample size, counts always summing exactly to that size
//! - **Fallback**: uniform estimate used when no usable estimate exists
//! - **Aggregator**: size-weighted combination of several persona groups,
//!   reduced to a single normalization
//!
//! ## Report
//!
//! - **Grouper**: section/question hierarchy with display percentages

pub mod allocation;
pub mod config;
pub mod core;
pub mod report;
pub mod simulation;
pub mod survey;

// Re-export commonly used types
pub use allocation::{
    Distribution, DistributionEntry, GroupContribution, GroupEstimate, RawEstimate, Reconciled,
    combine, fallback, format_percentage, normalize, parse_rate_estimate,
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use report::{OptionResult, QuestionResults, SectionResults, group_by_section};
pub use simulation::{
    PersonaGroup, PersonaGroupAllocation, QuestionDistributions, SimulationMetadata,
    SimulationMode, SimulationResult, split_sample,
};
pub use survey::{NO_OPTION_PROVIDED, Question, Questionnaire, Section};
