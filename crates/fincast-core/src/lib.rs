//! Fincast Core Library
//!
//! Shared functionality for the fincast financial-inclusion forecasting tool:
//! - CSV loaders for the unified records file and impact links
//! - Linear trend fitting and baseline projection
//! - Event impact model with lagged additive adjustments
//! - Scenario generation with confidence bands
//! - Target progress assessment and CSV report exports
//! - Reference sample dataset (Ethiopia)

pub mod config;
pub mod dataset;
pub mod error;
pub mod impact;
pub mod models;
pub mod report;
pub mod sample;
pub mod scenario;
pub mod trend;

pub use config::ForecastConfig;
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use impact::{ImpactMatrix, ImpactModel, ImpactSummaryRow, LinkValidation, ValidationVerdict};
pub use models::{
    Confidence, Event, EventCategory, ImpactDirection, ImpactLink, ImpactMagnitude, Observation,
    RecordType, Target,
};
pub use report::{ForecastRow, TargetStatus};
pub use scenario::{ForecastMetrics, Scenario, ScenarioPoint};
pub use trend::{ForecastPoint, TrendModel};
