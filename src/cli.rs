//! CLI argument parsing for Cotejo

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "cotejo")]
#[command(version)]
#[command(about = "Aggregate and compare grouped experiment runs", long_about = None)]
pub struct Cli {
    /// Root directory containing one subdirectory per experimental condition
    #[arg(short, long, value_name = "DIR")]
    pub root: PathBuf,

    /// Condition group to analyze (repeatable; order fixes the pairwise baseline)
    #[arg(short = 'g', long = "group", value_name = "NAME", required = true)]
    pub groups: Vec<String>,

    /// Checkpoint (e.g. generation) at which to run the comparison set (repeatable)
    #[arg(short = 'k', long = "checkpoint", value_name = "GEN")]
    pub checkpoints: Vec<u64>,

    /// 0-based CSV column holding the metric value
    #[arg(long = "value-column", value_name = "COL", default_value = "4")]
    pub value_column: usize,

    /// Metrics file name inside each trial directory
    #[arg(long = "metrics-file", value_name = "FILE", default_value = "dist.csv")]
    pub metrics_file: String,

    /// Significance level for flagging comparisons in the report
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Minimum contributing trials per group for running a test
    #[arg(long = "min-samples", value_name = "N", default_value = "2")]
    pub min_samples: usize,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose tracing output on stderr
    #[arg(long)]
    pub debug: bool,
}
