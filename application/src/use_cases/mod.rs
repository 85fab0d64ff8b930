//! Use cases (application services)

pub mod load_simulation;
pub mod run_simulation;
