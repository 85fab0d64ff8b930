//! Output formatter trait

use survey_application::RecordId;
use survey_domain::{OutputFormat, SectionResults, SimulationResult};

/// Everything a formatter may show about one simulation
#[derive(Debug, Clone, Copy)]
pub struct SimulationReport<'a> {
    pub record_id: Option<&'a RecordId>,
    pub result: &'a SimulationResult,
    pub sections: &'a [SectionResults],
}

/// Trait for formatting simulation results
pub trait OutputFormatter {
    /// Human-readable section/question table
    fn format_table(&self, report: &SimulationReport<'_>) -> String;

    /// Complete result including metadata, as JSON
    fn format_json(&self, report: &SimulationReport<'_>) -> String;

    /// Display hierarchy `[{title, questions: [{question, results}]}]` as JSON
    fn format_grouped(&self, report: &SimulationReport<'_>) -> String;

    /// Persisted `{question: {option: {count, pct}}}` form
    fn format_wire(&self, report: &SimulationReport<'_>) -> String;

    fn render(&self, format: OutputFormat, report: &SimulationReport<'_>) -> String {
        match format {
            OutputFormat::Table => self.format_table(report),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Grouped => self.format_grouped(report),
            OutputFormat::Wire => self.format_wire(report),
        }
    }
}
