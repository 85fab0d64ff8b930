//! Console output formatter for simulation results

use crate::output::formatter::{OutputFormatter, SimulationReport};
use colored::Colorize;
use serde_json::json;
use survey_domain::{
    OptionResult, QuestionResults, SectionResults, SimulationResult, format_percentage,
};

/// Formats simulation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the section/question table
    pub fn format_table(report: &SimulationReport<'_>) -> String {
        let result = report.result;
        let mut output = String::new();

        output.push_str(&Self::header("Survey Simulation Results"));
        output.push('\n');

        if let Some(id) = report.record_id {
            output.push_str(&format!("{} {}\n", "Record:".cyan().bold(), id));
        }
        output.push_str(&format!(
            "{} {} ({})\n",
            "Respondents:".cyan().bold(),
            result.sample_size,
            result.metadata.mode
        ));
        if !result.metadata.persona_groups.is_empty() {
            let groups = result
                .metadata
                .persona_groups
                .iter()
                .map(|g| format!("{} ({})", g.persona_group_id, g.sample_size))
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("{} {}\n", "Persona groups:".cyan().bold(), groups));
        }

        for section in report.sections {
            output.push_str(&Self::section_header(&section.title));
            if section.questions.is_empty() {
                output.push_str(&format!("  {}\n", "(no questions)".dimmed()));
            }
            for question in &section.questions {
                let fallback = result
                    .metadata
                    .fallback_questions
                    .iter()
                    .any(|q| q == &question.question);
                output.push_str(&Self::question_block(question, fallback));
            }
        }

        if result.metadata.used_fallback {
            output.push_str(&format!(
                "\n{} {} question(s) used an even split because no estimate was available\n",
                "Note:".yellow().bold(),
                result.metadata.fallback_questions.len()
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the complete result as JSON
    pub fn format_json(report: &SimulationReport<'_>) -> String {
        let value = json!({
            "record_id": report.record_id,
            "sample_size": report.result.sample_size,
            "distributions": report.result.distributions,
            "metadata": report.result.metadata,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the display hierarchy as JSON
    pub fn format_grouped(report: &SimulationReport<'_>) -> String {
        serde_json::to_string_pretty(report.sections).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format the persisted wire form
    pub fn format_wire(report: &SimulationReport<'_>) -> String {
        serde_json::to_string_pretty(&report.result.to_wire()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Sections for a result whose questionnaire is not at hand: one
    /// section holding every question in stored order.
    pub fn ungrouped_sections(result: &SimulationResult) -> Vec<SectionResults> {
        let questions = result
            .distributions
            .iter()
            .map(|(question, distribution)| QuestionResults {
                question: question.to_string(),
                results: distribution
                    .entries()
                    .iter()
                    .map(|e| OptionResult {
                        option: e.option.clone(),
                        count: e.count,
                        percentage: format_percentage(e.percentage),
                    })
                    .collect(),
            })
            .collect();
        vec![SectionResults {
            title: "Results".to_string(),
            questions,
        }]
    }

    fn question_block(question: &QuestionResults, fallback: bool) -> String {
        let mut block = String::new();

        let title = question.question.bold();
        if fallback {
            block.push_str(&format!("\n{} {}\n", title, "[fallback]".yellow()));
        } else {
            block.push_str(&format!("\n{}\n", title));
        }

        let option_width = question
            .results
            .iter()
            .map(|r| r.option.chars().count())
            .max()
            .unwrap_or(0);
        let count_width = question
            .results
            .iter()
            .map(|r| r.count.to_string().len())
            .max()
            .unwrap_or(1);

        for r in &question.results {
            block.push_str(&format!(
                "  {:<ow$}  {:>cw$}  {:>6}\n",
                r.option,
                r.count,
                r.percentage,
                ow = option_width,
                cw = count_width
            ));
        }
        block
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_table(&self, report: &SimulationReport<'_>) -> String {
        Self::format_table(report)
    }

    fn format_json(&self, report: &SimulationReport<'_>) -> String {
        Self::format_json(report)
    }

    fn format_grouped(&self, report: &SimulationReport<'_>) -> String {
        Self::format_grouped(report)
    }

    fn format_wire(&self, report: &SimulationReport<'_>) -> String {
        Self::format_wire(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_application::RecordId;
    use survey_domain::{
        Distribution, OutputFormat, Question, QuestionDistributions, Questionnaire, Section,
        SimulationMetadata, group_by_section,
    };

    fn fixture() -> (Questionnaire, SimulationResult) {
        let questionnaire = Questionnaire::new(
            "Appeal",
            vec![
                Section::new(
                    "Habits",
                    vec![Question::new("Favourite colour?", ["Red", "Green", "Blue"])],
                ),
                Section::new(
                    "Purchase",
                    vec![Question::new("Would you buy it?", ["Yes", "No"])],
                ),
            ],
        );
        let mut distributions = QuestionDistributions::new();
        distributions.insert(
            "Favourite colour?",
            Distribution::from_counts([("Red", 30), ("Green", 15), ("Blue", 5)]).unwrap(),
        );
        distributions.insert(
            "Would you buy it?",
            Distribution::from_counts([("Yes", 26), ("No", 24)]).unwrap(),
        );
        let mut metadata = SimulationMetadata::default();
        metadata.record_fallback("Would you buy it?");
        (
            questionnaire,
            SimulationResult::new(50, distributions, metadata),
        )
    }

    #[test]
    fn test_table_lists_sections_and_flags_fallback() {
        colored::control::set_override(false);
        let (questionnaire, result) = fixture();
        let sections = group_by_section(&questionnaire, &result.distributions);
        let id = RecordId::from("rec-1");
        let report = SimulationReport {
            record_id: Some(&id),
            result: &result,
            sections: &sections,
        };

        let table = ConsoleFormatter::format_table(&report);

        assert!(table.contains("Record: rec-1"));
        assert!(table.contains("Habits"));
        assert!(table.contains("  Red    30     60%"));
        assert!(table.contains("Would you buy it? [fallback]"));
        assert!(!table.contains("Favourite colour? [fallback]"));
        assert!(table.contains("1 question(s) used an even split"));
    }

    #[test]
    fn test_grouped_json_shape() {
        let (questionnaire, result) = fixture();
        let sections = group_by_section(&questionnaire, &result.distributions);
        let report = SimulationReport {
            record_id: None,
            result: &result,
            sections: &sections,
        };

        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter.render(OutputFormat::Grouped, &report)).unwrap();

        assert_eq!(value[0]["title"], "Habits");
        assert_eq!(value[0]["questions"][0]["question"], "Favourite colour?");
        assert_eq!(value[0]["questions"][0]["results"][2]["option"], "Blue");
        assert_eq!(value[0]["questions"][0]["results"][2]["percentage"], "10%");
        assert_eq!(value[1]["questions"][0]["results"][0]["percentage"], "52%");
    }

    #[test]
    fn test_wire_output() {
        let (_, result) = fixture();
        let report = SimulationReport {
            record_id: None,
            result: &result,
            sections: &[],
        };

        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_wire(&report)).unwrap();
        assert_eq!(value["Favourite colour?"]["Red"]["count"], 30);
        assert_eq!(value["Favourite colour?"]["Red"]["pct"], 60.0);
    }

    #[test]
    fn test_json_includes_metadata() {
        let (_, result) = fixture();
        let id = RecordId::from("rec-9");
        let report = SimulationReport {
            record_id: Some(&id),
            result: &result,
            sections: &[],
        };

        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&report)).unwrap();
        assert_eq!(value["record_id"], "rec-9");
        assert_eq!(value["sample_size"], 50);
        assert_eq!(value["metadata"]["used_fallback"], true);
    }

    #[test]
    fn test_ungrouped_sections_keep_stored_order() {
        let (_, result) = fixture();
        let sections = ConsoleFormatter::ungrouped_sections(&result);
        assert_eq!(sections.len(), 1);
        let questions: Vec<&str> = sections[0]
            .questions
            .iter()
            .map(|q| q.question.as_str())
            .collect();
        assert_eq!(questions, vec!["Favourite colour?", "Would you buy it?"]);
        assert_eq!(sections[0].questions[1].results[1].percentage, "48%");
    }
}
