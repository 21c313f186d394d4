//! Shared command utilities
//!
//! This module contains:
//! - `load_dataset` - Load the records and impact-links CSVs
//! - `load_config` - Resolve forecast config (override file or embedded defaults)
//! - `fit_baseline` - Fit a trend and project the forecast anchors

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use fincast_core::{Dataset, ForecastConfig, ForecastPoint, TrendModel};

/// Load the dataset from the two input CSVs
pub fn load_dataset(records: &Path, impacts: &Path) -> Result<Dataset> {
    Dataset::load(records, impacts)
        .with_context(|| format!("Failed to load dataset from {}", records.display()))
}

/// Resolve forecast config: override file when given, embedded defaults otherwise
pub fn load_config(path: Option<&Path>) -> Result<ForecastConfig> {
    match path {
        Some(path) => ForecastConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ForecastConfig::default()),
    }
}

/// Fit a trend for one indicator and project it over the config horizon
pub fn fit_baseline(
    dataset: &Dataset,
    config: &ForecastConfig,
    indicator_code: &str,
) -> Result<(TrendModel, Vec<ForecastPoint>)> {
    let history = dataset.observations_for(indicator_code);
    if history.len() < config.min_observations {
        anyhow::bail!(
            "Indicator {} has {} observations, need at least {}",
            indicator_code,
            history.len(),
            config.min_observations
        );
    }

    let model = TrendModel::fit(indicator_code, &history)
        .with_context(|| format!("Failed to fit trend for {}", indicator_code))?;

    let last_year = history
        .last()
        .map(|obs| obs.date.year())
        .context("No observations")?;
    let years = config.forecast_years(last_year);
    let baseline = model
        .baseline(&years, config.anchor_month, config.anchor_day)
        .with_context(|| format!("Failed to project baseline for {}", indicator_code))?;

    Ok((model, baseline))
}
