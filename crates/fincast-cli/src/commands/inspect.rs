//! Dataset summary command

use anyhow::Result;
use fincast_core::Dataset;

use super::truncate;

pub fn cmd_inspect(dataset: &Dataset) -> Result<()> {
    println!();
    println!("📋 Dataset Summary");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Observations: {}", dataset.observations.len());
    println!("   Events:       {}", dataset.events.len());
    println!("   Targets:      {}", dataset.targets.len());
    println!("   Impact links: {}", dataset.impacts.len());

    if let Some((first, last)) = dataset.date_range() {
        println!("   Date range:   {} to {}", first, last);
    }

    println!();
    println!(
        "   {:22} │ {:>4} │ {:>10} │ {:>10} │ {:>8}",
        "Indicator", "Obs", "First", "Last", "Latest"
    );
    println!("   ───────────────────────┼──────┼────────────┼────────────┼─────────");
    for code in dataset.indicator_codes() {
        let history = dataset.observations_for(&code);
        let first = history.first().map(|o| o.date.to_string()).unwrap_or_default();
        let last = history.last().map(|o| o.date.to_string()).unwrap_or_default();
        let latest = history.last().map(|o| o.value).unwrap_or(0.0);
        println!(
            "   {:22} │ {:>4} │ {:>10} │ {:>10} │ {:>8.2}",
            truncate(&code, 22),
            history.len(),
            first,
            last,
            latest
        );
    }

    if !dataset.events.is_empty() {
        println!();
        println!("   Events:");
        for event in &dataset.events {
            let links = dataset.impacts_for_event(&event.record_id).len();
            println!(
                "   {} {} │ {:15} │ {} ({} links)",
                event.record_id,
                event.date,
                event.category.as_str(),
                event.name,
                links
            );
        }
    }

    Ok(())
}
