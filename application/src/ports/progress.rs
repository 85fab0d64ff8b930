//! Progress notification port
//!
//! Defines the interface for reporting progress during a simulation run.

/// Callback for progress updates during a simulation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, nothing).
pub trait SimulationProgressNotifier: Send + Sync {
    /// Called once before any question is allocated
    fn on_simulation_start(&self, total_questions: usize, total_groups: usize);

    /// Called when a question's distribution is final
    fn on_question_complete(&self, question: &str, used_fallback: bool);

    /// Called once all questions are allocated, before persisting
    fn on_simulation_complete(&self);

    /// Called when an estimator call fails and the fallback is used
    fn on_estimate_fallback(&self, _group_id: &str, _question: &str, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl SimulationProgressNotifier for NoProgress {
    fn on_simulation_start(&self, _total_questions: usize, _total_groups: usize) {}
    fn on_question_complete(&self, _question: &str, _used_fallback: bool) {}
    fn on_simulation_complete(&self) {}
}
