//! Forecast and scenario command implementations

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use fincast_core::report::{self, ForecastRow};
use fincast_core::{scenario, Dataset, ForecastConfig, ImpactModel, Scenario};

use super::fit_baseline;

pub fn cmd_forecast(
    dataset: &Dataset,
    config: &ForecastConfig,
    indicator: Option<&str>,
    years: Option<u32>,
    output: Option<&Path>,
    no_impacts: bool,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(years) = years {
        if years == 0 {
            anyhow::bail!("--years must be at least 1");
        }
        config.horizon_years = years;
    }

    let codes: Vec<String> = match indicator {
        Some(code) => vec![code.to_string()],
        None => dataset.indicator_codes(),
    };
    if codes.is_empty() {
        anyhow::bail!("No indicators found in the dataset");
    }

    let impact_model = ImpactModel::new(dataset);
    let mut rows: Vec<ForecastRow> = Vec::new();

    println!();
    println!("📈 Trend Forecast");
    println!("   ─────────────────────────────────────────────────────────────");

    for code in &codes {
        let (model, baseline) = match fit_baseline(dataset, &config, code) {
            Ok(fitted) => fitted,
            Err(e) if indicator.is_none() => {
                // Skip unfittable indicators in the all-indicators sweep
                println!("   {:22} skipped: {}", code, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        println!();
        println!(
            "   {} (slope {}/yr, R² {:.3}, n={})",
            code,
            report::format_pp(model.annual_slope()),
            model.r_squared,
            model.n
        );

        let adjusted = if no_impacts {
            None
        } else {
            Some(impact_model.apply(&baseline, 1.0))
        };

        for (i, point) in baseline.iter().enumerate() {
            match &adjusted {
                Some(adjusted) => {
                    let delta = adjusted[i].value - point.value;
                    println!(
                        "   {:>6}   trend {:>6.2}   adjusted {:>6.2}   ({})",
                        point.date.year(),
                        point.value,
                        adjusted[i].value,
                        report::format_pp(delta)
                    );
                }
                None => {
                    println!("   {:>6}   trend {:>6.2}", point.date.year(), point.value);
                }
            }
        }

        rows.extend(baseline.iter().map(ForecastRow::from_baseline));
        if let Some(adjusted) = &adjusted {
            rows.extend(adjusted.iter().map(|p| {
                let mut row = ForecastRow::from_baseline(p);
                row.kind = "adjusted_forecast".to_string();
                row
            }));
        }
    }

    if let Some(path) = output {
        report::write_forecast_csv(path, &rows)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!();
        println!("✅ Wrote {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}

pub fn cmd_scenarios(
    dataset: &Dataset,
    config: &ForecastConfig,
    indicator: &str,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let (model, baseline) = fit_baseline(dataset, config, indicator)?;
    let points = scenario::generate_all(dataset, &baseline, indicator, config)?;

    let target = dataset.targets_for(indicator).first().map(|t| t.value);
    let metrics = scenario::forecast_metrics(&points, target)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        if let Some(path) = output {
            let rows = report::scenario_rows(&points);
            report::write_forecast_csv(path, &rows)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        return Ok(());
    }

    println!();
    println!("🎯 Scenario Forecast: {}", indicator);
    println!(
        "   Trend slope {}/yr over {} observations",
        report::format_pp(model.annual_slope()),
        model.n
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>6} │ {:>11} │ {:>7} │ {:>10} │ {:>17}",
        "Year", "Pessimistic", "Base", "Optimistic", "95% CI (base)"
    );
    println!("   ───────┼─────────────┼─────────┼────────────┼──────────────────");

    for base_point in points.iter().filter(|p| p.scenario == Scenario::Base) {
        let year = base_point.date.year();
        let value_for = |scenario: Scenario| {
            points
                .iter()
                .find(|p| p.scenario == scenario && p.date == base_point.date)
                .map(|p| p.value)
                .unwrap_or(base_point.value)
        };
        let band = match (base_point.ci_lower, base_point.ci_upper) {
            (Some(lower), Some(upper)) => format!("[{:.1}, {:.1}]", lower, upper),
            _ => "-".to_string(),
        };
        println!(
            "   {:>6} │ {:>11.2} │ {:>7.2} │ {:>10.2} │ {:>17}",
            year,
            value_for(Scenario::Pessimistic),
            base_point.value,
            value_for(Scenario::Optimistic),
            band
        );
    }

    println!();
    println!(
        "   Final forecast: {} (best {}, worst {})",
        report::format_percent(metrics.final_forecast),
        report::format_percent(metrics.best_case),
        report::format_percent(metrics.worst_case)
    );
    println!(
        "   Growth: {} total, {} per year",
        report::format_pp(metrics.total_growth),
        report::format_pp(metrics.avg_annual_growth)
    );
    if let (Some(target), Some(gap)) = (metrics.target_value, metrics.gap_to_target) {
        if metrics.on_track == Some(true) {
            println!(
                "   Target {}: on track ({} ahead)",
                report::format_percent(target),
                report::format_pp(-gap)
            );
        } else {
            println!(
                "   Target {}: {} short",
                report::format_percent(target),
                report::format_pp(gap)
            );
        }
    }

    if let Some(path) = output {
        let rows = report::scenario_rows(&points);
        report::write_forecast_csv(path, &rows)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!();
        println!("✅ Wrote {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}
