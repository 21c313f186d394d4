//! Impact link command implementations

use std::path::Path;

use anyhow::{Context, Result};
use fincast_core::{report, Dataset, ImpactModel, ValidationVerdict};

use super::truncate;

pub fn cmd_impacts_list(
    dataset: &Dataset,
    since: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let model = ImpactModel::new(dataset);
    let mut summary = model.summary();

    if let Some(since) = since {
        let cutoff = chrono::NaiveDate::parse_from_str(since, "%Y-%m-%d")
            .context("Invalid --since date format (use YYYY-MM-DD)")?;
        summary.retain(|row| row.event_date >= cutoff);
    }

    println!();
    println!("🔗 Impact Links ({})", summary.len());
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.is_empty() {
        println!("   No impact links in the dataset.");
        return Ok(());
    }

    println!(
        "   {:22} │ {:20} │ {:>8} │ {:>4} │ {:>10}",
        "Event", "Indicator", "Estimate", "Lag", "Effective"
    );
    println!("   ───────────────────────┼──────────────────────┼──────────┼──────┼───────────");
    for row in &summary {
        println!(
            "   {:22} │ {:20} │ {:>8} │ {:>3}m │ {:>10}",
            truncate(&row.event, 22),
            truncate(&row.indicator_code, 20),
            report::format_pp(row.estimate_pp),
            row.lag_months,
            row.effective_date
        );
    }

    if let Some(path) = output {
        report::write_impact_summary_csv(path, &summary)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!();
        println!("✅ Wrote {} rows to {}", summary.len(), path.display());
    }

    Ok(())
}

pub fn cmd_impacts_matrix(dataset: &Dataset) -> Result<()> {
    let model = ImpactModel::new(dataset);
    let matrix = model.matrix();

    println!();
    println!("🔢 Impact Matrix (pp per event and indicator)");
    println!("   ─────────────────────────────────────────────────────────────");

    if matrix.events.is_empty() {
        println!("   No impact links in the dataset.");
        return Ok(());
    }

    print!("   {:25}", "Event");
    for indicator in &matrix.indicators {
        print!(" │ {:>20}", truncate(indicator, 20));
    }
    println!();

    for (i, event) in matrix.events.iter().enumerate() {
        print!("   {:25}", truncate(event, 25));
        for cell in &matrix.cells[i] {
            if *cell == 0.0 {
                print!(" │ {:>20}", "-");
            } else {
                print!(" │ {:>20}", report::format_pp(*cell));
            }
        }
        println!();
    }

    Ok(())
}

pub fn cmd_impacts_validate(dataset: &Dataset, event: &str, indicator: &str) -> Result<()> {
    let model = ImpactModel::new(dataset);
    let validation = model.validate_link(event, indicator)?;

    println!();
    println!("🔍 Link Validation: {} → {}", validation.event, indicator);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Event date:       {} (effective {})",
        validation.event_date, validation.effective_date
    );
    println!(
        "   Predicted impact: {}",
        report::format_pp(validation.predicted_pp)
    );
    println!(
        "   Observed:         {:.2} → {:.2} over {:.1} years ({})",
        validation.value_before,
        validation.value_after,
        validation.period_years,
        report::format_pp(validation.observed_change)
    );
    println!(
        "   Annualized:       {}/yr",
        report::format_pp(validation.annualized_change)
    );

    match validation.verdict {
        ValidationVerdict::Good => {
            println!("   ✅ Verdict: good (estimate within 2pp of observed annualized change)")
        }
        ValidationVerdict::Moderate => {
            println!("   ⚠️  Verdict: moderate (estimate differs from observed by 2pp or more)")
        }
    }

    Ok(())
}
