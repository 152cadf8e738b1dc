use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "search-term-analyzer",
    version,
    about = "Bucket a Sponsored Products search term report and filter it safely"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a report and print the per-category summary as JSON.
    Analyze(AnalyzeArgs),
    /// Validate a filter and print the matching rows as JSON.
    Filter(FilterArgs),
    /// Write the negative-exact bulk sheet for Wasted Adspend terms.
    Negatives(NegativesArgs),
    /// Print the filter vocabulary and translator instructions.
    Schema,
}

#[derive(Args, Debug, Clone)]
pub struct ThresholdArgs {
    /// Inline thresholds JSON, e.g. '{"click_threshold": 15}'.
    #[arg(long, conflicts_with = "thresholds_file")]
    pub thresholds: Option<String>,

    #[arg(long)]
    pub thresholds_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Report file (.csv, .json, .parquet).
    pub file: PathBuf,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Also print every category's rows.
    #[arg(long, default_value_t = false)]
    pub rows: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    pub file: PathBuf,

    /// Filter structure as JSON.
    #[arg(long, required_unless_present = "prompt", conflicts_with = "prompt")]
    pub spec: Option<String>,

    /// Natural-language request handed to the translator command.
    #[arg(long, requires = "translator_cmd")]
    pub prompt: Option<String>,

    /// Translator program and its arguments, after `--`. Each argument is
    /// passed through as given.
    #[arg(last = true, value_name = "TRANSLATOR")]
    pub translator_cmd: Vec<String>,

    /// Restrict to one or more categories, e.g. "Wasted Adspend".
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

#[derive(Args, Debug, Clone)]
pub struct NegativesArgs {
    pub file: PathBuf,

    /// Destination CSV; stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}
