//! Progress reporting for simulation runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use survey_application::SimulationProgressNotifier;

/// Reports progress with a question counter bar; fallback warnings are
/// printed above the bar.
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationProgressNotifier for ProgressReporter {
    fn on_simulation_start(&self, total_questions: usize, total_groups: usize) {
        let pb = self.multi.add(ProgressBar::new(total_questions as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix(format!("Estimating ({} groups)", total_groups));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_question_complete(&self, question: &str, used_fallback: bool) {
        self.with_bar(|pb| {
            let status = if used_fallback {
                format!("{} {}", "~".yellow(), question)
            } else {
                format!("{} {}", "v".green(), question)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_simulation_complete(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{}", "Allocation complete!".green()));
        }
    }

    fn on_estimate_fallback(&self, group_id: &str, question: &str, reason: &str) {
        let line = format!(
            "  {} {} / {}: {}",
            "!".yellow(),
            group_id,
            question,
            reason.dimmed()
        );
        let _ = self.multi.println(line);
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SimulationProgressNotifier for SimpleProgress {
    fn on_simulation_start(&self, total_questions: usize, total_groups: usize) {
        eprintln!(
            "{} {} ({} questions, {} groups)",
            "->".cyan(),
            "Estimating".bold(),
            total_questions,
            total_groups
        );
    }

    fn on_question_complete(&self, question: &str, used_fallback: bool) {
        if used_fallback {
            eprintln!("  {} {} (fallback)", "~".yellow(), question);
        } else {
            eprintln!("  {} {}", "v".green(), question);
        }
    }

    fn on_simulation_complete(&self) {
        eprintln!();
    }

    fn on_estimate_fallback(&self, group_id: &str, question: &str, reason: &str) {
        eprintln!("  {} {} / {}: {}", "!".yellow(), group_id, question, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_questions() {
        let reporter = ProgressReporter::new();
        reporter.on_simulation_start(2, 1);
        reporter.on_question_complete("Q1?", false);
        reporter.on_question_complete("Q2?", true);

        let position = reporter
            .bar
            .lock()
            .unwrap()
            .as_ref()
            .map(|pb| pb.position());
        assert_eq!(position, Some(2));

        reporter.on_simulation_complete();
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_callbacks_before_start_are_ignored() {
        let reporter = ProgressReporter::default();
        reporter.on_question_complete("Q?", false);
        reporter.on_simulation_complete();
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
