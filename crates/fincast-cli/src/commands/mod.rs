//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load_dataset, load_config, fit_baseline)
//! - `forecast` - Trend forecast and scenario commands
//! - `impacts` - Impact link commands (list, matrix, validate)
//! - `inspect` - Dataset summary command
//! - `sample` - Sample data generation command
//! - `targets` - Target progress command

pub mod core;
pub mod forecast;
pub mod impacts;
pub mod inspect;
pub mod sample;
pub mod targets;

// Re-export command functions for main.rs
pub use core::*;
pub use forecast::*;
pub use impacts::*;
pub use inspect::*;
pub use sample::*;
pub use targets::*;

/// Truncate a string to a maximum length in characters, adding "..." if
/// truncated. Counts chars rather than bytes so multibyte names (Amharic
/// event names, for one) cannot split mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
