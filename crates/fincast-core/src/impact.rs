//! Event-impact composition
//!
//! Each impact link contributes a step change: its signed estimate is added
//! to every forecast point of the affected indicator dated on or after the
//! link's effective date (event date plus lag). Impacts from multiple events
//! sum additively; there is no decay and no interaction between events.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::models::{Event, ImpactLink};
use crate::trend::ForecastPoint;

/// Composes event impacts over a baseline forecast
pub struct ImpactModel<'a> {
    dataset: &'a Dataset,
}

/// One row of the flat impact summary (link joined to its parent event)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactSummaryRow {
    pub event: String,
    pub event_category: String,
    pub event_date: NaiveDate,
    pub indicator_code: String,
    pub direction: String,
    pub magnitude: String,
    pub estimate_pp: f64,
    pub lag_months: u32,
    pub effective_date: NaiveDate,
    pub evidence_basis: Option<String>,
    pub confidence: String,
}

/// Events-by-indicators grid of impact estimates
#[derive(Debug, Clone)]
pub struct ImpactMatrix {
    /// Event names, in date order
    pub events: Vec<String>,
    /// Affected indicator codes, sorted
    pub indicators: Vec<String>,
    /// cells[event][indicator], 0.0 where no link exists
    pub cells: Vec<Vec<f64>>,
}

/// How well a link's estimate matches the observed series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationVerdict {
    Good,
    Moderate,
}

impl ValidationVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
        }
    }
}

impl std::fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted-vs-observed comparison for one impact link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkValidation {
    pub event: String,
    pub event_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub indicator_code: String,
    pub predicted_pp: f64,
    pub value_before: f64,
    pub value_after: f64,
    pub observed_change: f64,
    pub period_years: f64,
    pub annualized_change: f64,
    pub verdict: ValidationVerdict,
}

impl<'a> ImpactModel<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Date at which a link's effect starts: event date plus lag months
    pub fn effective_date(event: &Event, link: &ImpactLink) -> NaiveDate {
        event
            .date
            .checked_add_months(Months::new(link.lag_months))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Add scaled step-change impacts to a baseline forecast.
    ///
    /// The multiplier scales every estimate (scenario knob); 1.0 is the base
    /// case. Links whose parent event is missing are ignored.
    pub fn apply(&self, baseline: &[ForecastPoint], multiplier: f64) -> Vec<ForecastPoint> {
        let mut adjusted = baseline.to_vec();

        for link in &self.dataset.impacts {
            let event = match self.dataset.event(&link.parent_id) {
                Some(event) => event,
                None => {
                    debug!(
                        "Impact link {} references unknown event {}, ignoring",
                        link.link_id, link.parent_id
                    );
                    continue;
                }
            };

            let start = Self::effective_date(event, link);
            let delta = link.signed_estimate() * multiplier;
            let mut applied = false;

            for point in adjusted
                .iter_mut()
                .filter(|p| p.indicator_code == link.indicator_code && p.date >= start)
            {
                point.value += delta;
                applied = true;
            }

            if applied {
                debug!(
                    "Applied {:+.1}pp to {} from {} (event {})",
                    delta, link.indicator_code, start, event.name
                );
            }
        }

        adjusted
    }

    /// Sum of signed estimates effective on an indicator by a reference date
    pub fn cumulative_impact(&self, indicator_code: &str, as_of: NaiveDate) -> f64 {
        self.dataset
            .impacts_on_indicator(indicator_code)
            .into_iter()
            .filter_map(|link| {
                let event = self.dataset.event(&link.parent_id)?;
                (Self::effective_date(event, link) <= as_of).then(|| link.signed_estimate())
            })
            .sum()
    }

    /// Flat impact summary, sorted by event date
    pub fn summary(&self) -> Vec<ImpactSummaryRow> {
        let mut rows: Vec<ImpactSummaryRow> = self
            .dataset
            .impacts
            .iter()
            .filter_map(|link| {
                let event = self.dataset.event(&link.parent_id)?;
                Some(ImpactSummaryRow {
                    event: event.name.clone(),
                    event_category: event.category.to_string(),
                    event_date: event.date,
                    indicator_code: link.indicator_code.clone(),
                    direction: link.direction.to_string(),
                    magnitude: link.magnitude.to_string(),
                    estimate_pp: link.estimate_pp,
                    lag_months: link.lag_months,
                    effective_date: Self::effective_date(event, link),
                    evidence_basis: link.evidence_basis.clone(),
                    confidence: link.confidence.to_string(),
                })
            })
            .collect();
        rows.sort_by_key(|r| r.event_date);
        rows
    }

    /// Event-by-indicator association matrix of impact estimates
    pub fn matrix(&self) -> ImpactMatrix {
        let mut events: Vec<&Event> = self
            .dataset
            .events
            .iter()
            .filter(|e| !self.dataset.impacts_for_event(&e.record_id).is_empty())
            .collect();
        events.sort_by_key(|e| e.date);

        let mut indicators: Vec<String> = Vec::new();
        for link in &self.dataset.impacts {
            if !indicators.contains(&link.indicator_code) {
                indicators.push(link.indicator_code.clone());
            }
        }
        indicators.sort();

        let cells = events
            .iter()
            .map(|event| {
                indicators
                    .iter()
                    .map(|code| {
                        self.dataset
                            .impacts_for_event(&event.record_id)
                            .into_iter()
                            .find(|l| &l.indicator_code == code)
                            .map(|l| l.signed_estimate())
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        ImpactMatrix {
            events: events.into_iter().map(|e| e.name.clone()).collect(),
            indicators,
            cells,
        }
    }

    /// Compare a link's estimate against the observed annualized change
    /// across its effective date.
    pub fn validate_link(&self, event_id: &str, indicator_code: &str) -> Result<LinkValidation> {
        let event = self
            .dataset
            .event(event_id)
            .ok_or_else(|| Error::NotFound(format!("Event {}", event_id)))?;
        let link = self
            .dataset
            .impacts_for_event(event_id)
            .into_iter()
            .find(|l| l.indicator_code == indicator_code)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No impact link from {} to {}",
                    event_id, indicator_code
                ))
            })?;

        let effective = Self::effective_date(event, link);
        let series = self.dataset.observations_for(indicator_code);
        let before = series.iter().filter(|o| o.date < effective).next_back();
        let after = series.iter().find(|o| o.date >= effective);

        let (before, after) = match (before, after) {
            (Some(b), Some(a)) => (b, a),
            _ => {
                return Err(Error::InvalidData(format!(
                    "Insufficient observations around {} for {}",
                    effective, indicator_code
                )))
            }
        };

        let observed_change = after.value - before.value;
        let period_years = (after.date - before.date).num_days() as f64 / 365.25;
        let annualized_change = if period_years > 0.0 {
            observed_change / period_years
        } else {
            observed_change
        };

        let verdict = if (annualized_change - link.estimate_pp).abs() < 2.0 {
            ValidationVerdict::Good
        } else {
            ValidationVerdict::Moderate
        };

        Ok(LinkValidation {
            event: event.name.clone(),
            event_date: event.date,
            effective_date: effective,
            indicator_code: indicator_code.to_string(),
            predicted_pp: link.estimate_pp,
            value_before: before.value,
            value_after: after.value,
            observed_change,
            period_years,
            annualized_change,
            verdict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Confidence, EventCategory, ImpactDirection, ImpactMagnitude, Observation,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn event(id: &str, name: &str, d: &str) -> Event {
        Event {
            record_id: id.to_string(),
            category: EventCategory::ProductLaunch,
            name: name.to_string(),
            date: date(d),
            source_name: None,
            confidence: Confidence::High,
            notes: None,
        }
    }

    fn link(id: &str, parent: &str, code: &str, estimate: f64, lag: u32) -> ImpactLink {
        ImpactLink {
            link_id: id.to_string(),
            parent_id: parent.to_string(),
            indicator_code: code.to_string(),
            direction: ImpactDirection::Positive,
            magnitude: ImpactMagnitude::Medium,
            estimate_pp: estimate,
            lag_months: lag,
            evidence_basis: None,
            evidence_source: None,
            confidence: Confidence::Medium,
            notes: None,
        }
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
                obs("ACC_MM_ACCOUNT", "2017-06-30", 4.7),
                obs("ACC_MM_ACCOUNT", "2021-06-30", 4.7),
                obs("ACC_MM_ACCOUNT", "2024-06-30", 9.45),
            ],
            events: vec![
                event("EVT_001", "Telebirr Launch", "2021-05-15"),
                event("EVT_003", "M-Pesa Launch", "2023-08-10"),
            ],
            targets: vec![],
            impacts: vec![
                link("IMP_001", "EVT_001", "ACC_MM_ACCOUNT", 4.0, 6),
                link("IMP_003", "EVT_003", "ACC_MM_ACCOUNT", 2.0, 6),
                link("IMP_ORPHAN", "EVT_MISSING", "ACC_MM_ACCOUNT", 99.0, 0),
            ],
        }
    }

    #[test]
    fn test_effective_date_adds_lag_months() {
        let ds = fixture();
        let ev = ds.event("EVT_001").unwrap();
        let lk = &ds.impacts[0];
        assert_eq!(ImpactModel::effective_date(ev, lk), date("2021-11-15"));
    }

    #[test]
    fn test_apply_is_step_change_after_effective_date() {
        let ds = fixture();
        let model = ImpactModel::new(&ds);

        let baseline = vec![
            point("ACC_MM_ACCOUNT", "2021-06-30", 5.0),
            point("ACC_MM_ACCOUNT", "2025-06-30", 10.0),
            point("ACC_MM_ACCOUNT", "2026-06-30", 11.0),
        ];
        let adjusted = model.apply(&baseline, 1.0);

        // Before Telebirr's effective date (2021-11-15): unchanged
        assert_eq!(adjusted[0].value, 5.0);
        // After both effective dates: +4 and +2, orphan link ignored
        assert_eq!(adjusted[1].value, 16.0);
        assert_eq!(adjusted[2].value, 17.0);
        // Baseline itself is untouched
        assert_eq!(baseline[1].value, 10.0);
    }

    #[test]
    fn test_apply_scales_with_multiplier() {
        let ds = fixture();
        let model = ImpactModel::new(&ds);
        let baseline = vec![point("ACC_MM_ACCOUNT", "2025-06-30", 10.0)];

        let optimistic = model.apply(&baseline, 1.3);
        let pessimistic = model.apply(&baseline, 0.7);
        assert!((optimistic[0].value - (10.0 + 6.0 * 1.3)).abs() < 1e-9);
        assert!((pessimistic[0].value - (10.0 + 6.0 * 0.7)).abs() < 1e-9);
    }

    #[test]
    fn test_apply_only_touches_matching_indicator() {
        let ds = fixture();
        let model = ImpactModel::new(&ds);
        let baseline = vec![point("ACC_OWNERSHIP", "2025-06-30", 50.0)];
        let adjusted = model.apply(&baseline, 1.0);
        assert_eq!(adjusted[0].value, 50.0);
    }

    #[test]
    fn test_cumulative_impact() {
        let ds = fixture();
        let model = ImpactModel::new(&ds);

        // Before any effective date
        assert_eq!(model.cumulative_impact("ACC_MM_ACCOUNT", date("2021-06-30")), 0.0);
        // After Telebirr only
        assert_eq!(model.cumulative_impact("ACC_MM_ACCOUNT", date("2022-06-30")), 4.0);
        // After both
        assert_eq!(model.cumulative_impact("ACC_MM_ACCOUNT", date("2024-06-30")), 6.0);
    }

    #[test]
    fn test_matrix_shape_and_zero_fill() {
        let mut ds = fixture();
        ds.impacts
            .push(link("IMP_X", "EVT_001", "USG_DIGITAL_PAYMENT", 5.0, 12));
        let matrix = ImpactModel::new(&ds).matrix();

        assert_eq!(matrix.events, vec!["Telebirr Launch", "M-Pesa Launch"]);
        assert_eq!(
            matrix.indicators,
            vec!["ACC_MM_ACCOUNT", "USG_DIGITAL_PAYMENT"]
        );
        // Telebirr affects both, M-Pesa only mobile money
        assert_eq!(matrix.cells[0], vec![4.0, 5.0]);
        assert_eq!(matrix.cells[1], vec![2.0, 0.0]);
    }

    #[test]
    fn test_summary_sorted_by_event_date() {
        let ds = fixture();
        let rows = ImpactModel::new(&ds).summary();
        // Orphan link dropped
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event, "Telebirr Launch");
        assert_eq!(rows[0].effective_date, date("2021-11-15"));
        assert_eq!(rows[1].event, "M-Pesa Launch");
    }

    #[test]
    fn test_validate_link_against_observations() {
        let ds = fixture();
        let model = ImpactModel::new(&ds);
        let validation = model.validate_link("EVT_001", "ACC_MM_ACCOUNT").unwrap();

        // Effective 2021-11-15: before = 2021-06-30 (4.7), after = 2024-06-30 (9.45)
        assert_eq!(validation.value_before, 4.7);
        assert_eq!(validation.value_after, 9.45);
        assert!((validation.observed_change - 4.75).abs() < 1e-9);
        assert!(validation.period_years > 2.9 && validation.period_years < 3.1);
        // Annualized ~1.58pp vs predicted 4.0pp: off by more than 2pp
        assert_eq!(validation.verdict, ValidationVerdict::Moderate);
    }

    #[test]
    fn test_validate_link_requires_data_on_both_sides() {
        let mut ds = fixture();
        ds.observations.retain(|o| o.date < date("2021-11-15"));
        let model = ImpactModel::new(&ds);
        assert!(model.validate_link("EVT_001", "ACC_MM_ACCOUNT").is_err());
    }

    #[test]
    fn test_validate_link_unknown_pair() {
        let ds = fixture();
        let model = ImpactModel::new(&ds);
        assert!(model.validate_link("EVT_404", "ACC_MM_ACCOUNT").is_err());
        assert!(model.validate_link("EVT_001", "NOPE").is_err());
    }
}
