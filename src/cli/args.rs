use crate::config::Config;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "report-compare")]
#[command(about = "Compare analytics reports across periods and segments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// ASCII-only output
    #[arg(long, global = true)]
    pub no_unicode: bool,

    /// Configuration file (default: .report-compare.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    /// Level used for the `report_compare` target when `RUST_LOG` is unset.
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a report from fixtures and add its comparison subtables
    Compare(CompareArgs),

    /// Print the comparison fetches a request would trigger
    Plan(PlanArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Report and request shared by `compare` and `plan`.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// API module of the report (e.g. Referrers)
    #[arg(short, long)]
    pub module: String,

    /// API action of the report (e.g. getWebsites)
    #[arg(short, long)]
    pub action: String,

    /// Request parameter as KEY=VALUE (repeatable), e.g. date1=2024-01-01
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Date that relative expressions (today, last7) resolve against, as YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// JSON fixture file answering report requests
    #[arg(short, long, value_name = "FILE")]
    pub fixtures: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,

    /// Fetch comparison tables one at a time
    #[arg(long)]
    pub sequential: bool,
}

impl CompareArgs {
    /// Fill options not given on the command line from the config file.
    pub fn merge_config(&mut self, config: &Config) {
        self.request.merge_config(config);
        if !self.sequential {
            if let Some(parallel) = config.fetch.parallel {
                self.sequential = !parallel;
            }
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

impl PlanArgs {
    pub fn merge_config(&mut self, config: &Config) {
        self.request.merge_config(config);
    }
}

impl RequestArgs {
    fn merge_config(&mut self, config: &Config) {
        if self.format.is_none() {
            self.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
