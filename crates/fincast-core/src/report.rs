//! Report exports and formatting
//!
//! CSV writers for forecast results and the impact summary, plus the
//! progress-to-target assessment used by the `targets` command.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::impact::ImpactSummaryRow;
use crate::scenario::{Scenario, ScenarioPoint};
use crate::trend::ForecastPoint;

/// One row of the forecast results CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRow {
    pub indicator_code: String,
    pub observation_date: String,
    pub value_numeric: f64,
    /// baseline_forecast or adjusted_forecast
    pub kind: String,
    pub scenario: Option<String>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
}

impl ForecastRow {
    pub fn from_baseline(point: &ForecastPoint) -> Self {
        Self {
            indicator_code: point.indicator_code.clone(),
            observation_date: point.date.format("%Y-%m-%d").to_string(),
            value_numeric: point.value,
            kind: "baseline_forecast".to_string(),
            scenario: None,
            ci_lower: None,
            ci_upper: None,
        }
    }

    pub fn from_scenario(point: &ScenarioPoint) -> Self {
        Self {
            indicator_code: point.indicator_code.clone(),
            observation_date: point.date.format("%Y-%m-%d").to_string(),
            value_numeric: point.value,
            kind: "adjusted_forecast".to_string(),
            scenario: Some(point.scenario.to_string()),
            ci_lower: point.ci_lower,
            ci_upper: point.ci_upper,
        }
    }
}

/// Write forecast rows to a CSV file
pub fn write_forecast_csv(path: &Path, rows: &[ForecastRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write forecast rows to any writer (used by tests)
pub fn write_forecast<W: Write>(writer: W, rows: &[ForecastRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the impact summary to a CSV file
pub fn write_impact_summary_csv(path: &Path, rows: &[ImpactSummaryRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Status tiers for progress toward a policy target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Achieved,
    OnTrack,
    Moderate,
    Behind,
}

impl TargetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Achieved => "achieved",
            Self::OnTrack => "on track",
            Self::Moderate => "moderate progress",
            Self::Behind => "behind target",
        }
    }
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percent of a target reached, mapped to a status tier
pub fn progress_to_target(current: f64, target: f64) -> (f64, TargetStatus) {
    if target == 0.0 {
        return (100.0, TargetStatus::Achieved);
    }
    let progress = (current / target) * 100.0;
    let status = if progress >= 100.0 {
        TargetStatus::Achieved
    } else if progress >= 80.0 {
        TargetStatus::OnTrack
    } else if progress >= 60.0 {
        TargetStatus::Moderate
    } else {
        TargetStatus::Behind
    };
    (progress, status)
}

/// Format a percentage value for display
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a percentage-point change with an explicit sign
pub fn format_pp(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.1}pp", value)
    } else {
        format!("{:.1}pp", value)
    }
}

/// Collect scenario points into CSV rows, base scenario last for readability
pub fn scenario_rows(points: &[ScenarioPoint]) -> Vec<ForecastRow> {
    let mut rows: Vec<ForecastRow> = Vec::with_capacity(points.len());
    for &scenario in &[Scenario::Pessimistic, Scenario::Optimistic, Scenario::Base] {
        rows.extend(
            points
                .iter()
                .filter(|p| p.scenario == scenario)
                .map(ForecastRow::from_scenario),
        );
    }
    rows
}
