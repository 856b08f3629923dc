//! CLI entrypoint for panel-consensus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use consensus_application::{
    AnalysisLogger, AnalysisParams, AnalyzeSurveyInput, AnalyzeSurveyUseCase, CampaignParams,
    CampaignProgressNotifier, CampaignTracker, NoAnalysisLogger, NoProgress,
    RunStabilityCampaignInput, RunStabilityCampaignUseCase,
};
use consensus_domain::{OutputFormat, ReportMode, Source};
use consensus_infrastructure::{
    ConfigLoader, DatasetLoader, FileConfig, JsonlAnalysisLogger, ReplayResponseGenerator,
};
use consensus_presentation::{
    CampaignProgressReporter, Cli, Command, InsightsArgs, ReportFormatter, SetArgs, SimpleProgress,
    StabilityArgs, formatter_for,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    info!("Starting panel-consensus");

    // === Configuration ===
    let config = load_config(&cli)?;
    let (mut analysis, _) = config.analysis.to_analysis_params();
    if let Some(comparator) = cli.comparator {
        analysis = analysis.with_comparator(comparator.into());
    }
    if let Some(alignment) = cli.alignment {
        analysis = analysis.with_alignment(alignment.into());
    }
    let (campaign, _) = config.campaign.to_campaign_params();

    let format: OutputFormat = cli
        .format
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    if !config.output.color || format == OutputFormat::Json {
        colored::control::set_override(false);
    }
    let formatter = formatter_for(format);

    // === Dependency Injection ===
    let logger = analysis_logger(&cli, &config);

    let output = match command {
        Command::Consensus(args) => {
            let (use_case, input) = analysis_input(args, analysis, logger)?;
            formatter.consensus(&use_case.consensus(&input, ReportMode::Aggregate))
        }
        Command::Compare(args) => {
            let (use_case, input) = analysis_input(args, analysis, logger)?;
            formatter.comparison(&input.catalog, &use_case.compare(&input)?)
        }
        Command::Consistency(args) => {
            let (use_case, input) = analysis_input(args, analysis, logger)?;
            formatter.consistency(&use_case.consistency(&input))
        }
        Command::Insights(args) => run_insights(args, analysis, logger, formatter.as_ref())?,
        Command::Stability(args) => {
            let progress: Box<dyn CampaignProgressNotifier> = match (cli.quiet, format) {
                (true, _) => Box::new(NoProgress),
                (false, OutputFormat::Text) => Box::new(CampaignProgressReporter::new()),
                (false, OutputFormat::Json) => Box::new(SimpleProgress),
            };
            run_stability(args, analysis, campaign, logger, formatter.as_ref(), progress.as_ref())
                .await?
        }
    };

    println!("{}", output);

    Ok(())
}

/// Initialize tracing based on verbosity level, optionally into a file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Load and validate configuration; warnings are reported, errors abort
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    match config.ensure_valid() {
        Ok(warnings) => {
            for issue in warnings {
                warn!("{}", issue.message);
                if !cli.quiet {
                    eprintln!("{}", issue);
                }
            }
            Ok(config)
        }
        Err(err) => {
            for issue in &err.issues {
                eprintln!("{}", issue);
            }
            Err(err.into())
        }
    }
}

fn analysis_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn AnalysisLogger> {
    let path = cli
        .analysis_log
        .clone()
        .or_else(|| config.logging.analysis_log_path());
    match path.and_then(JsonlAnalysisLogger::new) {
        Some(logger) => {
            info!("Analysis log: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoAnalysisLogger),
    }
}

fn analysis_input(
    args: &SetArgs,
    params: AnalysisParams,
    logger: Arc<dyn AnalysisLogger>,
) -> Result<(AnalyzeSurveyUseCase, AnalyzeSurveyInput)> {
    let catalog = DatasetLoader::load_catalog(&args.questions)?;
    let sets = DatasetLoader::load_response_sets(&args.sets)?;
    let use_case = AnalyzeSurveyUseCase::new(params).with_logger(logger);
    Ok((use_case, AnalyzeSurveyInput::new(catalog, sets)))
}

fn run_insights(
    args: &InsightsArgs,
    mut params: AnalysisParams,
    logger: Arc<dyn AnalysisLogger>,
    formatter: &dyn ReportFormatter,
) -> Result<String> {
    if let Some(mode) = args.mode {
        params = params.with_mode(mode.into());
    }
    if let Some(window) = args.window {
        if window == 0 {
            bail!("--window must be at least 1");
        }
        params.insights = params.insights.with_window(window);
    }
    if let Some(baseline) = &args.baseline {
        let Ok(source) = baseline.parse::<Source>();
        params.insights = params.insights.with_baseline(source);
    }

    let (use_case, input) = analysis_input(&args.input, params, logger)?;
    let report = use_case.execute(&input)?;
    Ok(formatter.report(&report))
}

async fn run_stability(
    args: &StabilityArgs,
    analysis: AnalysisParams,
    mut campaign: CampaignParams,
    logger: Arc<dyn AnalysisLogger>,
    formatter: &dyn ReportFormatter,
    progress: &dyn CampaignProgressNotifier,
) -> Result<String> {
    let catalog = DatasetLoader::load_catalog(&args.questions)?;
    let reruns = DatasetLoader::load_response_sets(&args.reruns)?;
    let generator = ReplayResponseGenerator::new(reruns);

    let personas = match &args.personas {
        Some(path) => DatasetLoader::load_personas(path)?,
        None => generator.personas().to_vec(),
    };

    // The replayed files decide how many reruns exist
    if generator.rerun_count() != campaign.rerun_count {
        info!(
            "Replaying {} rerun files (configured rerun_count is {})",
            generator.rerun_count(),
            campaign.rerun_count
        );
    }
    campaign = campaign.with_rerun_count(generator.rerun_count());
    if let Some(max) = args.max_concurrency {
        campaign = campaign.with_max_concurrency(max);
    }
    if campaign.rerun_count < 2 {
        warn!("Fewer than two reruns: every question will report no data");
    }

    let use_case = RunStabilityCampaignUseCase::new(Arc::new(generator), Arc::new(CampaignTracker::new()))
        .with_engine(analysis.engine())
        .with_logger(logger);
    let input = RunStabilityCampaignInput::new(catalog.clone(), personas).with_params(campaign);

    let output = use_case
        .execute_with_progress(input, progress)
        .await
        .context("Rerun campaign could not start")?;
    Ok(formatter.stability(&catalog, &output))
}
