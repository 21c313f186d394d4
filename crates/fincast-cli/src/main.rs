//! Fincast CLI - Financial inclusion forecasting
//!
//! Usage:
//!   fincast sample                          Write the reference dataset
//!   fincast inspect                         Summarize the loaded dataset
//!   fincast forecast --output out.csv       Project all indicator trends
//!   fincast scenarios --indicator CODE      Compare base/optimistic/pessimistic
//!   fincast impacts validate --event EVT_001 --indicator CODE

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Sample { dir } => commands::cmd_sample(&dir),
        Commands::Inspect => {
            let dataset = commands::load_dataset(&cli.data, &cli.impacts)?;
            commands::cmd_inspect(&dataset)
        }
        Commands::Forecast {
            indicator,
            years,
            output,
            no_impacts,
        } => {
            let dataset = commands::load_dataset(&cli.data, &cli.impacts)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_forecast(
                &dataset,
                &config,
                indicator.as_deref(),
                years,
                output.as_deref(),
                no_impacts,
            )
        }
        Commands::Scenarios {
            indicator,
            output,
            json,
        } => {
            let dataset = commands::load_dataset(&cli.data, &cli.impacts)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_scenarios(&dataset, &config, &indicator, output.as_deref(), json)
        }
        Commands::Impacts { action } => {
            let dataset = commands::load_dataset(&cli.data, &cli.impacts)?;
            match action {
                None => commands::cmd_impacts_list(&dataset, None, None),
                Some(ImpactsAction::List { since, output }) => {
                    commands::cmd_impacts_list(&dataset, since.as_deref(), output.as_deref())
                }
                Some(ImpactsAction::Matrix) => commands::cmd_impacts_matrix(&dataset),
                Some(ImpactsAction::Validate { event, indicator }) => {
                    commands::cmd_impacts_validate(&dataset, &event, &indicator)
                }
            }
        }
        Commands::Targets => {
            let dataset = commands::load_dataset(&cli.data, &cli.impacts)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_targets(&dataset, &config)
        }
    }
}
