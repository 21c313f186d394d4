//! Forecast configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An override file passed on the command line, when provided
//! 2. Embedded defaults (compiled into the binary)
//!
//! Every key is optional in an override file; missing keys fall back to the
//! embedded values.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/forecast.toml");

/// Validated forecast settings
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Calendar years to project past the last observation
    pub horizon_years: u32,
    /// Anchor month within each forecast year
    pub anchor_month: u32,
    /// Anchor day within the anchor month
    pub anchor_day: u32,
    /// Minimum observations required to fit a trend
    pub min_observations: usize,
    /// Impact multiplier for the optimistic scenario
    pub optimistic_multiplier: f64,
    /// Impact multiplier for the pessimistic scenario
    pub pessimistic_multiplier: f64,
    /// Two-sided confidence level for the base-scenario interval
    pub confidence_level: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        // The embedded file is part of the build; a parse failure here is a
        // packaging bug surfaced at first use
        Self::from_toml(DEFAULT_CONFIG).unwrap_or(Self {
            horizon_years: 4,
            anchor_month: 6,
            anchor_day: 30,
            min_observations: 2,
            optimistic_multiplier: 1.3,
            pessimistic_multiplier: 0.7,
            confidence_level: 0.95,
        })
    }
}

impl ForecastConfig {
    /// Load from an override file, falling back to embedded defaults for
    /// missing keys
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    fn from_toml(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents)?;
        let forecast = raw.forecast.unwrap_or_default();
        let scenarios = raw.scenarios.unwrap_or_default();
        let confidence = raw.confidence.unwrap_or_default();

        let config = Self {
            horizon_years: forecast.horizon_years.unwrap_or(4),
            anchor_month: forecast.anchor_month.unwrap_or(6),
            anchor_day: forecast.anchor_day.unwrap_or(30),
            min_observations: forecast.min_observations.unwrap_or(2),
            optimistic_multiplier: scenarios.optimistic_multiplier.unwrap_or(1.3),
            pessimistic_multiplier: scenarios.pessimistic_multiplier.unwrap_or(0.7),
            confidence_level: confidence.level.unwrap_or(0.95),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.horizon_years == 0 {
            return Err(Error::Config("horizon_years must be at least 1".into()));
        }
        if !(1..=12).contains(&self.anchor_month) || !(1..=31).contains(&self.anchor_day) {
            return Err(Error::Config(format!(
                "Invalid forecast anchor {:02}-{:02}",
                self.anchor_month, self.anchor_day
            )));
        }
        if self.min_observations < 2 {
            return Err(Error::Config("min_observations must be at least 2".into()));
        }
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(Error::Config(format!(
                "confidence level {} must be in (0, 1)",
                self.confidence_level
            )));
        }
        if self.optimistic_multiplier <= 0.0 || self.pessimistic_multiplier <= 0.0 {
            return Err(Error::Config("scenario multipliers must be positive".into()));
        }
        Ok(())
    }

    /// Forecast years: the horizon immediately after the last observed year
    pub fn forecast_years(&self, last_observed_year: i32) -> Vec<i32> {
        (1..=self.horizon_years as i32)
            .map(|offset| last_observed_year + offset)
            .collect()
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    forecast: Option<RawForecast>,
    scenarios: Option<RawScenarios>,
    confidence: Option<RawConfidence>,
}

#[derive(Debug, Deserialize, Default)]
struct RawForecast {
    horizon_years: Option<u32>,
    anchor_month: Option<u32>,
    anchor_day: Option<u32>,
    min_observations: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct RawScenarios {
    optimistic_multiplier: Option<f64>,
    pessimistic_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawConfidence {
    level: Option<f64>,
}
