//! Simulation domain.
//!
//! - [`persona::PersonaGroup`]: a respondent archetype with its sub-sample
//! - [`result::SimulationResult`]: distributions plus metadata for one run

pub mod persona;
pub mod result;

pub use persona::{PersonaGroup, PersonaGroupAllocation, split_sample};
pub use result::{QuestionDistributions, SimulationMetadata, SimulationMode, SimulationResult};
