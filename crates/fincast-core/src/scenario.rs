//! Scenario generation and forecast uncertainty
//!
//! Three scenarios scale the event-impact estimates: base (1.0x),
//! optimistic, and pessimistic. Confidence bands on the base scenario come
//! from the spread of historical growth rates, a Student's-t quantile for
//! the sample size, and a sqrt(years-ahead) widening, clamped to [0, 100].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::config::ForecastConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::impact::ImpactModel;
use crate::models::Observation;
use crate::trend::ForecastPoint;

/// Forecast scenarios, ordered pessimistic to optimistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Pessimistic,
    Base,
    Optimistic,
}

impl Scenario {
    pub fn all() -> &'static [Scenario] {
        &[Scenario::Pessimistic, Scenario::Base, Scenario::Optimistic]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pessimistic => "pessimistic",
            Self::Base => "base",
            Self::Optimistic => "optimistic",
        }
    }

    /// Impact estimate multiplier for this scenario
    pub fn multiplier(&self, config: &ForecastConfig) -> f64 {
        match self {
            Self::Pessimistic => config.pessimistic_multiplier,
            Self::Base => 1.0,
            Self::Optimistic => config.optimistic_multiplier,
        }
    }
}

impl std::str::FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pessimistic" => Ok(Self::Pessimistic),
            "base" => Ok(Self::Base),
            "optimistic" => Ok(Self::Optimistic),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scenario forecast value, with a confidence band on the base scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub indicator_code: String,
    pub date: NaiveDate,
    pub value: f64,
    pub scenario: Scenario,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
}

/// Key figures summarizing a scenario set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub indicator_code: String,
    /// Base-scenario value at the end of the horizon
    pub final_forecast: f64,
    pub forecast_years: Vec<i32>,
    /// Base-scenario change from first to last forecast point
    pub total_growth: f64,
    pub avg_annual_growth: f64,
    pub best_case: f64,
    pub worst_case: f64,
    pub scenario_range: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_to_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_track: Option<bool>,
}

/// Generate all three scenarios over a baseline forecast for one indicator.
///
/// The base scenario carries the confidence band; optimistic and pessimistic
/// rows do not.
pub fn generate_all(
    dataset: &Dataset,
    baseline: &[ForecastPoint],
    indicator_code: &str,
    config: &ForecastConfig,
) -> Result<Vec<ScenarioPoint>> {
    let impact_model = ImpactModel::new(dataset);
    let history = dataset.observations_for(indicator_code);
    let mut points = Vec::with_capacity(baseline.len() * Scenario::all().len());

    for &scenario in Scenario::all() {
        let adjusted = impact_model.apply(baseline, scenario.multiplier(config));

        let bands = if scenario == Scenario::Base {
            Some(confidence_intervals(
                &history,
                &adjusted,
                config.confidence_level,
            )?)
        } else {
            None
        };

        for (i, point) in adjusted.into_iter().enumerate() {
            let (ci_lower, ci_upper) = match &bands {
                Some(bands) => (Some(bands[i].0), Some(bands[i].1)),
                None => (None, None),
            };
            points.push(ScenarioPoint {
                indicator_code: point.indicator_code,
                date: point.date,
                value: point.value,
                scenario,
                ci_lower,
                ci_upper,
            });
        }
    }

    Ok(points)
}

/// Confidence band per forecast point, from historical growth-rate spread.
///
/// Fewer than 3 observations give no meaningful variance; a fixed +/-10%
/// band is used instead.
pub fn confidence_intervals(
    history: &[&Observation],
    forecast: &[ForecastPoint],
    confidence_level: f64,
) -> Result<Vec<(f64, f64)>> {
    if history.len() < 3 {
        return Ok(forecast
            .iter()
            .map(|p| (p.value * 0.90, p.value * 1.10))
            .collect());
    }

    let growth_std = growth_rate_std(history);
    let n = history.len() as f64;
    let t_dist = StudentsT::new(0.0, 1.0, n - 1.0)
        .map_err(|e| Error::Forecast(format!("t-distribution: {}", e)))?;
    let t_value = t_dist.inverse_cdf((1.0 + confidence_level) / 2.0);

    let min_year = forecast
        .iter()
        .map(|p| p.date.year())
        .min()
        .ok_or_else(|| Error::Forecast("Empty forecast".into()))?;

    Ok(forecast
        .iter()
        .map(|point| {
            // Uncertainty grows with the horizon
            let years_ahead = (point.date.year() - min_year + 1) as f64;
            let margin = point.value * growth_std * t_value * years_ahead.sqrt();
            ((point.value - margin).max(0.0), (point.value + margin).min(100.0))
        })
        .collect())
}

/// Sample standard deviation of period-over-period growth rates.
///
/// Periods starting from a zero value are skipped (a launch-year zero would
/// otherwise blow up the rate).
fn growth_rate_std(history: &[&Observation]) -> f64 {
    let rates: Vec<f64> = history
        .windows(2)
        .filter(|w| w[0].value.abs() > f64::EPSILON)
        .map(|w| (w[1].value - w[0].value) / w[0].value)
        .collect();

    if rates.len() < 2 {
        return 0.0;
    }

    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
    let variance =
        rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (rates.len() as f64 - 1.0);
    variance.sqrt()
}

/// Compute summary metrics from a scenario set, optionally against a target
pub fn forecast_metrics(
    points: &[ScenarioPoint],
    target_value: Option<f64>,
) -> Result<ForecastMetrics> {
    let base: Vec<&ScenarioPoint> = points
        .iter()
        .filter(|p| p.scenario == Scenario::Base)
        .collect();
    let (first, last) = match (base.first(), base.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::Forecast("Scenario set has no base points".into())),
    };

    let final_forecast = last.value;
    let total_growth = last.value - first.value;

    let final_for = |scenario: Scenario| {
        points
            .iter()
            .filter(|p| p.scenario == scenario)
            .next_back()
            .map(|p| p.value)
            .unwrap_or(final_forecast)
    };
    let best_case = final_for(Scenario::Optimistic);
    let worst_case = final_for(Scenario::Pessimistic);

    let gap_to_target = target_value.map(|t| t - final_forecast);

    Ok(ForecastMetrics {
        indicator_code: last.indicator_code.clone(),
        final_forecast,
        forecast_years: base.iter().map(|p| p.date.year()).collect(),
        total_growth,
        avg_annual_growth: total_growth / base.len() as f64,
        best_case,
        worst_case,
        scenario_range: best_case - worst_case,
        target_value,
        gap_to_target,
        on_track: gap_to_target.map(|gap| gap <= 0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Event, EventCategory, ImpactDirection, ImpactLink, ImpactMagnitude};
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn obs(code: &str, d: &str, value: f64) -> Observation {
        Observation {
            record_id: format!("OBS_{}", d),
            pillar: None,
            indicator: code.to_string(),
            indicator_code: code.to_string(),
            value,
            date: date(d),
            source_type: None,
            source_name: None,
            confidence: Confidence::High,
        }
    }

    fn point(code: &str, d: &str, value: f64) -> ForecastPoint {
        ForecastPoint {
            indicator_code: code.to_string(),
            date: date(d),
            value,
        }
    }

    fn fixture() -> Dataset {
        Dataset {
            observations: vec![
                obs("ACC_OWNERSHIP", "2014-06-30", 22.0),
                obs("ACC_OWNERSHIP", "2017-06-30", 35.0),
                obs("ACC_OWNERSHIP", "2021-06-30", 46.0),
                obs("ACC_OWNERSHIP", "2024-06-30", 49.0),
            ],
            events: vec![Event {
                record_id: "EVT_005".to_string(),
                category: EventCategory::Policy,
                name: "NBE Digital Strategy".to_string(),
                date: date("2023-03-01"),
                source_name: None,
                confidence: Confidence::High,
                notes: None,
            }],
            targets: vec![],
            impacts: vec![ImpactLink {
                link_id: "IMP_007".to_string(),
                parent_id: "EVT_005".to_string(),
                indicator_code: "ACC_OWNERSHIP".to_string(),
                direction: ImpactDirection::Positive,
                magnitude: ImpactMagnitude::Medium,
                estimate_pp: 2.0,
                lag_months: 18,
                evidence_basis: None,
                evidence_source: None,
                confidence: Confidence::Low,
                notes: None,
            }],
        }
    }

    fn baseline() -> Vec<ForecastPoint> {
        vec![
            point("ACC_OWNERSHIP", "2025-06-30", 52.0),
            point("ACC_OWNERSHIP", "2026-06-30", 54.0),
            point("ACC_OWNERSHIP", "2027-06-30", 56.0),
        ]
    }

    #[test]
    fn test_scenario_parsing() {
        assert_eq!(Scenario::from_str("BASE").unwrap(), Scenario::Base);
        assert!(Scenario::from_str("wildcard").is_err());
    }

    #[test]
    fn test_generate_all_orders_and_scales() {
        let ds = fixture();
        let config = ForecastConfig::default();
        let points = generate_all(&ds, &baseline(), "ACC_OWNERSHIP", &config).unwrap();

        assert_eq!(points.len(), 9);

        let final_value = |s: Scenario| {
            points
                .iter()
                .filter(|p| p.scenario == s)
                .next_back()
                .unwrap()
                .value
        };
        // Impact effective 2024-09-01, so all forecast points carry it
        assert!((final_value(Scenario::Base) - 58.0).abs() < 1e-9);
        assert!((final_value(Scenario::Optimistic) - (56.0 + 2.6)).abs() < 1e-9);
        assert!((final_value(Scenario::Pessimistic) - (56.0 + 1.4)).abs() < 1e-9);
    }

    #[test]
    fn test_only_base_scenario_has_bands() {
        let ds = fixture();
        let config = ForecastConfig::default();
        let points = generate_all(&ds, &baseline(), "ACC_OWNERSHIP", &config).unwrap();

        for p in &points {
            if p.scenario == Scenario::Base {
                assert!(p.ci_lower.is_some() && p.ci_upper.is_some());
                assert!(p.ci_lower.unwrap() <= p.value);
                assert!(p.ci_upper.unwrap() >= p.value);
            } else {
                assert!(p.ci_lower.is_none() && p.ci_upper.is_none());
            }
        }
    }

    #[test]
    fn test_bands_widen_with_horizon() {
        // Steady ~5% growth keeps the margins small, so no band reaches the
        // [0, 100] clamp and the sqrt(years-ahead) widening stays visible
        let calm = [
            obs("ACC_OWNERSHIP", "2021-06-30", 40.0),
            obs("ACC_OWNERSHIP", "2022-06-30", 42.0),
            obs("ACC_OWNERSHIP", "2023-06-30", 44.0),
            obs("ACC_OWNERSHIP", "2024-06-30", 46.0),
        ];
        let history: Vec<&Observation> = calm.iter().collect();
        let bands = confidence_intervals(&history, &baseline(), 0.95).unwrap();

        for (band, point) in bands.iter().zip(baseline()) {
            assert!(band.0 > 0.0 && band.1 < 100.0);
            assert!(band.0 < point.value && point.value < band.1);
        }

        let width = |b: (f64, f64)| b.1 - b.0;
        assert!(width(bands[1]) > width(bands[0]));
        assert!(width(bands[2]) > width(bands[1]));
    }

    #[test]
    fn test_bands_saturate_at_percentage_bounds() {
        // A volatile history pushes every margin past the clamp; widths stop
        // growing instead of escaping [0, 100]
        let ds = fixture();
        let history = ds.observations_for("ACC_OWNERSHIP");
        let bands = confidence_intervals(&history, &baseline(), 0.95).unwrap();

        for band in &bands {
            assert!(band.0 >= 0.0);
            assert!(band.1 <= 100.0);
        }
    }

    #[test]
    fn test_short_history_uses_fixed_band() {
        let short = [obs("X", "2023-06-30", 40.0), obs("X", "2024-06-30", 44.0)];
        let history: Vec<&Observation> = short.iter().collect();
        let forecast = vec![point("X", "2025-06-30", 50.0)];

        let bands = confidence_intervals(&history, &forecast, 0.95).unwrap();
        assert!((bands[0].0 - 45.0).abs() < 1e-9);
        assert!((bands[0].1 - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_bands_clamped_to_percentage_range() {
        let noisy = [
            obs("X", "2020-06-30", 10.0),
            obs("X", "2021-06-30", 40.0),
            obs("X", "2022-06-30", 15.0),
            obs("X", "2023-06-30", 60.0),
        ];
        let history: Vec<&Observation> = noisy.iter().collect();
        let forecast = vec![point("X", "2030-06-30", 95.0)];

        let bands = confidence_intervals(&history, &forecast, 0.99).unwrap();
        assert!(bands[0].0 >= 0.0);
        assert!(bands[0].1 <= 100.0);
    }

    #[test]
    fn test_growth_rate_skips_zero_start() {
        let with_zero = [
            obs("X", "2021-06-30", 0.0),
            obs("X", "2022-06-30", 20.0),
            obs("X", "2023-06-30", 34.0),
            obs("X", "2024-06-30", 54.0),
        ];
        let history: Vec<&Observation> = with_zero.iter().collect();
        let std = growth_rate_std(&history);
        assert!(std.is_finite());
        assert!(std > 0.0);
    }

    #[test]
    fn test_forecast_metrics_with_target() {
        let ds = fixture();
        let config = ForecastConfig::default();
        let points = generate_all(&ds, &baseline(), "ACC_OWNERSHIP", &config).unwrap();

        let metrics = forecast_metrics(&points, Some(60.0)).unwrap();
        assert_eq!(metrics.indicator_code, "ACC_OWNERSHIP");
        assert!((metrics.final_forecast - 58.0).abs() < 1e-9);
        assert_eq!(metrics.forecast_years, vec![2025, 2026, 2027]);
        assert!((metrics.total_growth - 4.0).abs() < 1e-9);
        assert!((metrics.gap_to_target.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(metrics.on_track, Some(false));
        assert!((metrics.scenario_range - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_metrics_requires_base_points() {
        assert!(forecast_metrics(&[], None).is_err());
    }
}
