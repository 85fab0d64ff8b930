//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;
use survey_domain::OutputFormat;

/// CLI arguments for survey-sim
#[derive(Parser, Debug)]
#[command(name = "survey-sim")]
#[command(author, version, about = "Simulate survey responses with exact respondent counts")]
#[command(long_about = r#"
survey-sim estimates how persona groups would answer a questionnaire and
turns those estimates into exact respondent counts per option.

For every question:
1. Estimate: each persona group gets a response-rate estimate
2. Allocate: estimates are apportioned onto the sample size (largest remainder)
3. Combine: with --combined, groups are merged weighted by their size

Questions whose estimate could not be obtained fall back to an even split
and are flagged in the output.

Configuration files are loaded from (in priority order):
1. SURVEY_* environment variables
2. --config <path>     Explicit config file
3. ./survey.toml       Project-level config
4. ~/.config/survey-sim/config.toml   Global config

Example:
  survey-sim questionnaire.json -n 200
  survey-sim questionnaire.json --personas personas.json --combined -o grouped
  survey-sim questionnaire.json --load 3f2b9c1e-...
"#)]
pub struct Cli {
    /// Questionnaire JSON file (`{"research_objective", "sections": [...]}`)
    #[arg(value_name = "QUESTIONNAIRE")]
    pub questionnaire: Option<PathBuf>,

    /// Persona groups JSON file (array of `{"id", "profile", "sample_size"}`)
    #[arg(short, long, value_name = "FILE")]
    pub personas: Option<PathBuf>,

    /// Respondents for the default persona group
    #[arg(short = 'n', long, value_name = "SIZE")]
    pub sample_size: Option<u64>,

    /// Split this many respondents across the persona groups by their weight
    #[arg(long, value_name = "N", requires = "personas")]
    pub total: Option<u64>,

    /// Merge all persona groups into one size-weighted distribution
    #[arg(long)]
    pub combined: bool,

    /// Output format
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Use estimates from a JSON fixture instead of the configured estimator
    #[arg(long, value_name = "FILE")]
    pub estimates: Option<PathBuf>,

    /// Keep simulation records in this directory
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Per-estimate timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Append simulation events to a JSONL audit log
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Show a stored simulation instead of running a new one
    #[arg(long, value_name = "RECORD_ID")]
    pub load: Option<String>,

    /// List stored simulation records and exit
    #[arg(long, conflicts_with = "load")]
    pub list: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
