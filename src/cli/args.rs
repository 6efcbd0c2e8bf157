//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    compare::CompareArgs, completions::CompletionsArgs, failures::FailuresArgs,
    inspect::InspectArgs, ranges::RangesArgs, summary::SummaryArgs,
};

#[derive(Parser, Debug)]
#[command(name = "qid")]
#[command(author, version, about = "Quality Inspection Toolkit")]
#[command(
    long_about = "Quality Inspection Toolkit\n\nEvaluate jumbo roll production records against parameter ranges, \
analyze why NOT-OK records fail and compare value distributions across grades and machines."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Production dataset (CSV export)
    #[arg(long, short = 'd', global = true, env = "QID_DATA")]
    pub data: Option<PathBuf>,

    /// Config file (default: ./.qid.yaml, then the user config directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); QID_LOG overrides
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect one track or jumbo roll against all parameter ranges
    Inspect(InspectArgs),

    /// Which parameters fail across all NOT-OK records
    Failures(FailuresArgs),

    /// Value distribution of one parameter by grade and machine
    Compare(CompareArgs),

    /// Show the resolved parameter ranges
    Ranges(RangesArgs),

    /// Dataset overview
    Summary(SummaryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty text for single results, tables for lists
    #[default]
    Auto,
    /// Styled human-readable text
    Pretty,
    /// Boxed table
    Table,
    Json,
    Yaml,
    Csv,
    /// Markdown table
    Md,
}
