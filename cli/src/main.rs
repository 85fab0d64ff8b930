//! CLI entrypoint for survey-sim
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use survey_application::{
    LoadSimulationUseCase, NoSimulationLogger, RateEstimator, RecordId, RunSimulationInput,
    RunSimulationUseCase, SimulationEventLogger, SimulationStore,
};
use survey_domain::{PersonaGroup, Questionnaire, SimulationMode, split_sample};
use survey_infrastructure::{
    ConfigLoader, EstimatorKind, FileConfig, FileRateEstimator, InMemorySimulationStore,
    JsonFileSimulationStore, JsonlSimulationLogger, UniformRateEstimator,
};
use survey_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress, SimulationReport,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_GROUP_ID: &str = "default";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let warnings = config.ensure_valid()?;
    for issue in &warnings {
        warn!("{}", issue.message);
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting survey-sim");

    // === Dependency Injection ===
    let store = Arc::new(build_store(&config)?);
    let format = cli.output.or(config.output.format).unwrap_or_default();

    if cli.list {
        let ids = LoadSimulationUseCase::new(store).list().await?;
        for id in ids {
            println!("{}", id);
        }
        return Ok(());
    }

    let questionnaire = cli
        .questionnaire
        .as_deref()
        .map(read_questionnaire)
        .transpose()?;

    if let Some(record_id) = &cli.load {
        if config.store.directory.is_none() {
            bail!("--load needs a record directory. Use --store or [store].directory.");
        }
        let output = LoadSimulationUseCase::new(store)
            .execute(&RecordId::from(record_id.as_str()), questionnaire.as_ref())
            .await?;
        let sections = output
            .grouped
            .unwrap_or_else(|| ConsoleFormatter::ungrouped_sections(&output.result));
        let report = SimulationReport {
            record_id: Some(&output.record_id),
            result: &output.result,
            sections: &sections,
        };
        println!("{}", ConsoleFormatter.render(format, &report));
        return Ok(());
    }

    let Some(questionnaire) = questionnaire else {
        bail!("A questionnaire file is required. Use --load to show a stored simulation.");
    };

    let groups = build_groups(&cli, &config)?;
    let mut input = RunSimulationInput::new(questionnaire, groups);
    if cli.combined {
        input = input.with_mode(SimulationMode::Combined);
    }

    let estimator = Arc::new(build_estimator(&config)?);
    let logger: Arc<dyn SimulationEventLogger> = match &config.logging.audit_log {
        Some(path) => match JsonlSimulationLogger::open(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoSimulationLogger),
        },
        None => Arc::new(NoSimulationLogger),
    };

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    let use_case = RunSimulationUseCase::new(estimator, store)
        .with_behavior(config.simulation.to_behavior())
        .with_logger(logger)
        .with_cancellation(cancellation);

    let output = if cli.quiet {
        use_case.execute(input).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await?
    };

    let report = SimulationReport {
        record_id: Some(&output.record_id),
        result: &output.result,
        sections: &output.grouped,
    };
    println!("{}", ConsoleFormatter.render(format, &report));

    Ok(())
}

/// Install the tracing subscriber; the returned guard flushes file logs on drop.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "survey-sim.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Command-line flags win over every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(size) = cli.sample_size {
        config.simulation.sample_size = size;
    }
    if let Some(timeout) = cli.timeout {
        config.simulation.timeout_seconds = Some(timeout);
    }
    if let Some(path) = &cli.estimates {
        config.estimator.kind = EstimatorKind::File.as_str().to_string();
        config.estimator.path = Some(path.clone());
    }
    if let Some(dir) = &cli.store {
        config.store.directory = Some(dir.clone());
    }
    if let Some(path) = &cli.audit_log {
        config.logging.audit_log = Some(path.clone());
    }
}

fn build_store(config: &FileConfig) -> Result<Box<dyn SimulationStore>> {
    Ok(match &config.store.directory {
        Some(dir) => Box::new(JsonFileSimulationStore::new(dir)?),
        None => Box::new(InMemorySimulationStore::new()),
    })
}

fn build_estimator(config: &FileConfig) -> Result<Box<dyn RateEstimator>> {
    let (kind, issues) = config.estimator.parse_kind();
    let Some(kind) = kind else {
        bail!(
            "{}",
            issues
                .first()
                .map(|i| i.message.clone())
                .unwrap_or_else(|| "unknown estimator kind".to_string())
        );
    };

    Ok(match kind {
        EstimatorKind::Uniform => Box::new(UniformRateEstimator::new()),
        EstimatorKind::File => {
            let Some(path) = &config.estimator.path else {
                bail!("estimator.path is required when kind = \"file\"");
            };
            Box::new(FileRateEstimator::from_path(path)?)
        }
        EstimatorKind::Http => build_http_estimator(config)?,
    })
}

#[cfg(feature = "http-estimator")]
fn build_http_estimator(config: &FileConfig) -> Result<Box<dyn RateEstimator>> {
    let Some(endpoint) = &config.estimator.endpoint else {
        bail!("estimator.endpoint is required when kind = \"http\"");
    };
    Ok(Box::new(survey_infrastructure::HttpRateEstimator::new(
        endpoint,
    )?))
}

#[cfg(not(feature = "http-estimator"))]
fn build_http_estimator(_config: &FileConfig) -> Result<Box<dyn RateEstimator>> {
    bail!("this build does not include the HTTP estimator (feature `http-estimator`)");
}

fn read_questionnaire(path: &Path) -> Result<Questionnaire> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read questionnaire {}", path.display()))?;
    let questionnaire: Questionnaire = serde_json::from_str(&content)
        .with_context(|| format!("Invalid questionnaire {}", path.display()))?;
    if questionnaire.is_empty() {
        bail!("Questionnaire {} contains no questions", path.display());
    }
    Ok(questionnaire)
}

/// Persona groups from `--personas`, or one default group.
///
/// `--total` (or, when every group omits `sample_size`, the configured
/// sample size) is apportioned across the groups by weight.
fn build_groups(cli: &Cli, config: &FileConfig) -> Result<Vec<PersonaGroup>> {
    let Some(path) = &cli.personas else {
        return Ok(vec![PersonaGroup::new(
            DEFAULT_GROUP_ID,
            config.simulation.sample_size,
        )]);
    };

    let mut groups = read_personas(path)?;
    if groups.is_empty() {
        bail!("Persona file {} contains no groups", path.display());
    }

    let total = cli.total.or_else(|| {
        groups
            .iter()
            .all(|g| g.sample_size == 0)
            .then_some(config.simulation.sample_size)
    });
    if let Some(total) = total {
        split_sample(&mut groups, total)?;
    }

    Ok(groups)
}

fn read_personas(path: &Path) -> Result<Vec<PersonaGroup>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read persona groups {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid persona groups {}", path.display()))
}
