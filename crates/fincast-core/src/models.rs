//! Domain models for fincast

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Record types in the unified data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Observation,
    Event,
    Target,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Event => "event",
            Self::Target => "target",
        }
    }
}

impl std::str::FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observation" => Ok(Self::Observation),
            "event" => Ok(Self::Event),
            "target" => Ok(Self::Target),
            _ => Err(format!("Unknown record type: {}", s)),
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source confidence grading used across all record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Regulatory or strategy change (e.g. a national inclusion strategy)
    Policy,
    /// A new service entering the market (e.g. a mobile money launch)
    ProductLaunch,
    /// Rails and reach (interoperability switches, network coverage)
    Infrastructure,
    /// Competitive or structural market shifts
    Market,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::ProductLaunch => "product_launch",
            Self::Infrastructure => "infrastructure",
            Self::Market => "market",
        }
    }
}

impl std::str::FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "policy" => Ok(Self::Policy),
            "product_launch" | "launch" => Ok(Self::ProductLaunch),
            "infrastructure" => Ok(Self::Infrastructure),
            "market" => Ok(Self::Market),
            _ => Err(format!("Unknown event category: {}", s)),
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of an event's effect on an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImpactDirection {
    #[default]
    Positive,
    Negative,
}

impl ImpactDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl std::str::FromStr for ImpactDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            _ => Err(format!("Unknown impact direction: {}", s)),
        }
    }
}

impl std::fmt::Display for ImpactDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Qualitative sizing of an impact, alongside the numeric estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImpactMagnitude {
    High,
    #[default]
    Medium,
    Low,
}

impl ImpactMagnitude {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for ImpactMagnitude {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown impact magnitude: {}", s)),
        }
    }
}

impl std::fmt::Display for ImpactMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A measured historical data point for one indicator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub record_id: String,
    /// Thematic grouping (e.g. "Banking", "Digital Payments")
    pub pillar: Option<String>,
    /// Human-readable indicator name
    pub indicator: String,
    /// Stable indicator code (e.g. ACC_OWNERSHIP)
    pub indicator_code: String,
    /// Percentage of adults (0-100), or millions for operator user counts
    pub value: f64,
    pub date: NaiveDate,
    /// survey, operator, regulator, ...
    pub source_type: Option<String>,
    pub source_name: Option<String>,
    pub confidence: Confidence,
}

/// A dated policy or market event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub record_id: String,
    pub category: EventCategory,
    /// Short event name (e.g. "Telebirr Launch")
    pub name: String,
    pub date: NaiveDate,
    pub source_name: Option<String>,
    pub confidence: Confidence,
    pub notes: Option<String>,
}

/// A policy goal for an indicator at a future date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub record_id: String,
    pub pillar: Option<String>,
    pub indicator: String,
    /// Code of the indicator the target applies to, with any TGT_ prefix stripped
    pub indicator_code: String,
    pub value: f64,
    pub date: NaiveDate,
    pub source_name: Option<String>,
    pub confidence: Confidence,
}

/// A link from an event to an indicator it is expected to move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactLink {
    pub link_id: String,
    /// record_id of the parent event
    pub parent_id: String,
    /// Code of the affected indicator
    pub indicator_code: String,
    pub direction: ImpactDirection,
    pub magnitude: ImpactMagnitude,
    /// Estimated effect in percentage points, applied additively
    pub estimate_pp: f64,
    /// Months between the event and its measurable effect
    pub lag_months: u32,
    /// comparable, market, policy, ...
    pub evidence_basis: Option<String>,
    pub evidence_source: Option<String>,
    pub confidence: Confidence,
    pub notes: Option<String>,
}

impl ImpactLink {
    /// Estimate with direction applied (negative links subtract)
    pub fn signed_estimate(&self) -> f64 {
        match self.direction {
            ImpactDirection::Positive => self.estimate_pp,
            ImpactDirection::Negative => -self.estimate_pp,
        }
    }
}
