//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fincast - Financial inclusion indicator forecasting
#[derive(Parser)]
#[command(name = "fincast")]
#[command(about = "Trend and event-impact forecasting for inclusion indicators", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Unified records CSV (observations, events, targets)
    #[arg(long, default_value = "data/records.csv", global = true)]
    pub data: PathBuf,

    /// Impact links CSV
    #[arg(long, default_value = "data/impact_links.csv", global = true)]
    pub impacts: PathBuf,

    /// Forecast config file (overrides embedded defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the Ethiopia reference dataset as input CSVs
    Sample {
        /// Directory to write records.csv and impact_links.csv into
        #[arg(short, long, default_value = "data")]
        dir: PathBuf,
    },

    /// Summarize the loaded dataset
    Inspect,

    /// Project indicator trends forward
    Forecast {
        /// Forecast a single indicator code (all indicators if omitted)
        #[arg(short, long)]
        indicator: Option<String>,

        /// Override the forecast horizon in years
        #[arg(short, long)]
        years: Option<u32>,

        /// Write forecast rows to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip event-impact adjustments (pure trend extrapolation)
        #[arg(long)]
        no_impacts: bool,
    },

    /// Generate base, optimistic, and pessimistic scenarios
    Scenarios {
        /// Indicator code to forecast
        #[arg(short, long)]
        indicator: String,

        /// Write scenario rows to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the summary metrics as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Inspect event-impact links
    Impacts {
        #[command(subcommand)]
        action: Option<ImpactsAction>,
    },

    /// Assess progress toward policy targets
    Targets,
}

#[derive(Subcommand)]
pub enum ImpactsAction {
    /// List all impact links in event order
    List {
        /// Only show links from events on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Write the summary to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the event-by-indicator impact matrix
    Matrix,

    /// Compare a link's estimate against observed indicator movement
    Validate {
        /// Event record ID (e.g. EVT_001)
        #[arg(short, long)]
        event: String,

        /// Indicator code the link points at
        #[arg(short, long)]
        indicator: String,
    },
}
