//! Sample data command implementation

use std::path::Path;

use anyhow::{Context, Result};
use fincast_core::sample::{self, IMPACTS_FILE, RECORDS_FILE};

pub fn cmd_sample(dir: &Path) -> Result<()> {
    println!("🔧 Writing sample dataset to {}...", dir.display());

    sample::write_sample_csvs(dir)
        .with_context(|| format!("Failed to write sample data to {}", dir.display()))?;

    let dataset = sample::sample_dataset();
    println!(
        "   {} observations, {} events, {} targets, {} impact links",
        dataset.observations.len(),
        dataset.events.len(),
        dataset.targets.len(),
        dataset.impacts.len()
    );
    println!("✅ Wrote {} and {}", RECORDS_FILE, IMPACTS_FILE);
    println!();
    println!("Next steps:");
    println!("  1. Inspect the data:    fincast inspect");
    println!("  2. Run a forecast:      fincast forecast");
    println!(
        "  3. Compare scenarios:   fincast scenarios --indicator ACC_OWNERSHIP"
    );

    Ok(())
}
