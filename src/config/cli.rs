use clap::{Parser, ValueEnum};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    /// Pricing snapshot as JSON
    Json,
    /// Payment plan as CSV
    Csv,
    /// Human-readable summary
    Preview,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "contract-pricing")]
#[command(about = "Price a contract and generate its payment plan")]
pub struct CliConfig {
    /// Path to TOML quote file
    #[arg(short, long, default_value = "quote.toml")]
    pub config: String,

    #[arg(long, value_enum, default_value = "preview")]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the applicant count from the quote file
    #[arg(long)]
    pub applicants: Option<i64>,

    /// Override the start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Best-effort pricing: never fail on incomplete input
    #[arg(long)]
    pub lenient: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,
}
