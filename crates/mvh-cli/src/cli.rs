//! CLI argument definitions for `mvh`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mvh_model::DuplicateKeyPolicy;

#[derive(Parser)]
#[command(
    name = "mvh",
    version,
    about = "Money vs Happiness - reconcile country-year indicators into one table",
    long_about = "Reconcile eleven country-year indicator sources into one table.\n\n\
                  Sources are normalized to (Country, Year) keys, inner-joined, \n\
                  cleaned of incomplete rows and extended with derived indicators."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the reconciled and engineered tables.
    Build(BuildArgs),

    /// Derive features from an existing reconciled table.
    Engineer(EngineerArgs),

    /// Filter an output table and print per-column statistics.
    Describe(DescribeArgs),

    /// List the recognized sources.
    Sources,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// TOML file with the data directory and per-source paths.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the source files (overrides the config file).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output directory for the written tables (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write only the reconciled table.
    #[arg(long = "no-features")]
    pub no_features: bool,

    /// Run every stage without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// What to do when a source repeats a (Country, Year) key
    /// (overrides the config file).
    #[arg(long = "duplicate-keys", value_enum, value_name = "POLICY")]
    pub duplicate_keys: Option<DuplicateKeysArg>,
}

#[derive(Parser)]
pub struct EngineerArgs {
    /// Reconciled table to read.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the engineered table (default: next to INPUT).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DescribeArgs {
    /// Reconciled or engineered table to read.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Keep only this country (repeatable).
    #[arg(long = "country", value_name = "NAME")]
    pub countries: Vec<String>,

    /// First year to keep.
    #[arg(long = "from-year", value_name = "YEAR")]
    pub from_year: Option<i64>,

    /// Last year to keep.
    #[arg(long = "to-year", value_name = "YEAR")]
    pub to_year: Option<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicateKeysArg {
    Reject,
    KeepFirst,
}

impl From<DuplicateKeysArg> for DuplicateKeyPolicy {
    fn from(value: DuplicateKeysArg) -> Self {
        match value {
            DuplicateKeysArg::Reject => Self::Reject,
            DuplicateKeysArg::KeepFirst => Self::KeepFirst,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
