//! Target progress command implementation

use anyhow::Result;
use chrono::Datelike;
use fincast_core::{report, scenario, Dataset, ForecastConfig, TargetStatus};

use super::fit_baseline;

/// Match a target's indicator code to an observed series, by exact name or
/// unique suffix
fn resolve_indicator(dataset: &Dataset, code: &str) -> String {
    let codes = dataset.indicator_codes();
    if codes.iter().any(|c| c == code) {
        return code.to_string();
    }
    let mut matches = codes.iter().filter(|c| c.ends_with(code));
    match (matches.next(), matches.next()) {
        (Some(found), None) => found.clone(),
        _ => code.to_string(),
    }
}

pub fn cmd_targets(dataset: &Dataset, config: &ForecastConfig) -> Result<()> {
    println!();
    println!("🎯 Target Progress");
    println!("   ─────────────────────────────────────────────────────────────");

    if dataset.targets.is_empty() {
        println!("   No targets in the dataset.");
        return Ok(());
    }

    for target in &dataset.targets {
        // Target codes may carry a shorter name than the observed series
        // (e.g. DIGITAL_PAYMENT vs USG_DIGITAL_PAYMENT)
        let code = resolve_indicator(dataset, &target.indicator_code);
        let code = &code;
        println!();
        println!(
            "   {} → {} by {} ({})",
            code,
            report::format_percent(target.value),
            target.date.year(),
            target.source_name.as_deref().unwrap_or("unknown source")
        );

        let Some(latest) = dataset.latest_observation(code) else {
            println!("   No observations for this indicator.");
            continue;
        };

        let (progress, status) = report::progress_to_target(latest.value, target.value);
        let marker = match status {
            TargetStatus::Achieved => "✅",
            TargetStatus::OnTrack => "🟢",
            TargetStatus::Moderate => "🟡",
            TargetStatus::Behind => "🔴",
        };
        println!(
            "   {} Current: {} as of {} ({} of target, {})",
            marker,
            report::format_percent(latest.value),
            latest.date,
            report::format_percent(progress),
            status
        );

        // Forecast gap at the end of the horizon, impacts included
        match fit_baseline(dataset, config, code) {
            Ok((_, baseline)) => {
                let points = scenario::generate_all(dataset, &baseline, code, config)?;
                let metrics = scenario::forecast_metrics(&points, Some(target.value))?;
                let final_year = metrics.forecast_years.last().copied().unwrap_or_default();
                match metrics.gap_to_target {
                    Some(gap) if gap <= 0.0 => println!(
                        "   Forecast {} by {}: clears the target by {}",
                        report::format_percent(metrics.final_forecast),
                        final_year,
                        report::format_pp(-gap)
                    ),
                    Some(gap) => println!(
                        "   Forecast {} by {}: {} short of the target",
                        report::format_percent(metrics.final_forecast),
                        final_year,
                        report::format_pp(gap)
                    ),
                    None => {}
                }
            }
            Err(e) => println!("   Forecast unavailable: {}", e),
        }
    }

    Ok(())
}
