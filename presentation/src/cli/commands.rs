//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use consensus_domain::{AlignmentKind, ComparatorKind, OutputFormat, ReportMode};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Colored human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComparatorArg {
    /// Equal, or one normalized text contains the other
    Containment,
    /// Exact equality after normalization
    Strict,
}

impl From<ComparatorArg> for ComparatorKind {
    fn from(arg: ComparatorArg) -> Self {
        match arg {
            ComparatorArg::Containment => ComparatorKind::Containment,
            ComparatorArg::Strict => ComparatorKind::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlignmentArg {
    /// Pair respondents by position
    Positional,
    /// Pair respondents by their respondent index
    RespondentIndex,
}

impl From<AlignmentArg> for AlignmentKind {
    fn from(arg: AlignmentArg) -> Self {
        match arg {
            AlignmentArg::Positional => AlignmentKind::Positional,
            AlignmentArg::RespondentIndex => AlignmentKind::RespondentIndex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Pairwise agreement against a baseline plus per-source consensus
    Compare,
    /// Combined consensus over every set
    Aggregate,
}

impl From<ModeArg> for ReportMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Compare => ReportMode::Compare,
            ModeArg::Aggregate => ReportMode::Aggregate,
        }
    }
}

/// CLI arguments for panel-consensus
#[derive(Parser, Debug)]
#[command(name = "panel-consensus")]
#[command(author, version, about = "Consensus and stability analysis for synthetic survey panels")]
#[command(long_about = r#"
panel-consensus compares the answers that simulated respondents gave to a survey.

Every command reads a question catalog (JSON) and one or more response sets
(JSON, one file per model or rerun). Answers are normalized and compared with
one comparator for the whole run.

Configuration files are loaded from (in priority order):
1. --config <path>              Explicit config file
2. PANEL_CONSENSUS_* variables  e.g. PANEL_CONSENSUS_ANALYSIS__COMPARATOR=strict
3. ./panel-consensus.toml       Project-level config
4. ~/.config/panel-consensus/config.toml   Global config

Example:
  panel-consensus consensus -Q questions.json --set gpt.json --set claude.json
  panel-consensus compare -Q questions.json --set gpt.json --set claude.json
  panel-consensus stability -Q questions.json --rerun r1.json --rerun r2.json --rerun r3.json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output].format)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Answer comparator (overrides [analysis].comparator)
    #[arg(long, value_enum, global = true)]
    pub comparator: Option<ComparatorArg>,

    /// Respondent alignment (overrides [analysis].alignment)
    #[arg(long, value_enum, global = true)]
    pub alignment: Option<AlignmentArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Append structured analysis events to this JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub analysis_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dominant answer and confidence per question over all sets
    Consensus(SetArgs),
    /// Pairwise agreement and variance between exactly two sets
    Compare(SetArgs),
    /// Internal consistency of each set
    Consistency(SetArgs),
    /// Replay rerun sets as a campaign and score answer stability
    Stability(StabilityArgs),
    /// Survey-level insights plus the per-question report
    Insights(InsightsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// Question catalog JSON
    #[arg(short = 'Q', long, value_name = "PATH")]
    pub questions: PathBuf,

    /// Response set JSON (repeat for several sets)
    #[arg(short, long = "set", value_name = "PATH", required = true)]
    pub sets: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StabilityArgs {
    /// Question catalog JSON
    #[arg(short = 'Q', long, value_name = "PATH")]
    pub questions: PathBuf,

    /// Rerun response set JSON, in rerun order (repeat for each rerun)
    #[arg(short, long = "rerun", value_name = "PATH", required = true)]
    pub reruns: Vec<PathBuf>,

    /// Persona list JSON; derived from the rerun files when omitted
    #[arg(long, value_name = "PATH")]
    pub personas: Option<PathBuf>,

    /// Generation calls in flight (overrides [campaign].max_concurrency)
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct InsightsArgs {
    #[command(flatten)]
    pub input: SetArgs,

    /// Report mode (overrides [analysis].mode)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Source compared against (overrides [analysis].baseline)
    #[arg(long, value_name = "SOURCE")]
    pub baseline: Option<String>,

    /// Questions averaged into consensus strength
    #[arg(long, value_name = "N")]
    pub window: Option<usize>,
}
