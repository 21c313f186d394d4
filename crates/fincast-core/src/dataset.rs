//! CSV loading for the unified records file and impact links
//!
//! The unified file mixes observations, events, and targets discriminated by
//! a `record_type` column; impact links live in a separate file. An optional
//! `supplementary.csv` next to the records file is appended before the split.
//! Malformed rows are skipped with a warning rather than failing the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    Confidence, Event, EventCategory, ImpactDirection, ImpactLink, ImpactMagnitude, Observation,
    RecordType, Target,
};

/// In-memory view of one country's records, loaded once per run
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Historical data points, sorted by date
    pub observations: Vec<Observation>,
    /// Policy and market events, sorted by date
    pub events: Vec<Event>,
    /// Policy targets
    pub targets: Vec<Target>,
    /// Event-to-indicator impact links
    pub impacts: Vec<ImpactLink>,
}

impl Dataset {
    /// Load from a records CSV and an impact links CSV.
    ///
    /// A `supplementary.csv` in the records file's directory is appended to
    /// the unified records when present. A missing impacts file is tolerated
    /// and yields an empty link set.
    pub fn load(records_path: &Path, impacts_path: &Path) -> Result<Self> {
        if !records_path.exists() {
            return Err(Error::NotFound(format!(
                "Data file not found at {}",
                records_path.display()
            )));
        }

        debug!("Loading records from {}", records_path.display());
        let mut dataset = Self::default();
        dataset.read_records(File::open(records_path)?)?;

        // Enrichment step: optional supplementary observations
        let supp_path = records_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("supplementary.csv");
        if supp_path.exists() {
            debug!("Loading supplementary data from {}", supp_path.display());
            dataset.read_records(File::open(&supp_path)?)?;
        }

        if impacts_path.exists() {
            dataset.read_impacts(File::open(impacts_path)?)?;
        } else {
            warn!(
                "Impact links file not found at {}, continuing without impacts",
                impacts_path.display()
            );
        }

        dataset.finish_load();
        Ok(dataset)
    }

    /// Load from in-memory readers (used by tests and the sample builder)
    pub fn from_readers<R1: Read, R2: Read>(records: R1, impacts: R2) -> Result<Self> {
        let mut dataset = Self::default();
        dataset.read_records(records)?;
        dataset.read_impacts(impacts)?;
        dataset.finish_load();
        Ok(dataset)
    }

    fn finish_load(&mut self) {
        self.observations.sort_by_key(|o| o.date);
        self.events.sort_by_key(|e| e.date);
        debug!(
            "Loaded {} observations, {} events, {} targets, {} impact links",
            self.observations.len(),
            self.events.len(),
            self.targets.len(),
            self.impacts.len()
        );
    }

    /// Parse the unified records file, splitting rows by record_type
    fn read_records<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        for (row_num, result) in rdr.records().enumerate() {
            let record = result?;
            let row = Row::new(&headers, &record);

            let record_type = match row
                .get("record_type")
                .and_then(|s| RecordType::from_str(s).ok())
            {
                Some(rt) => rt,
                None => {
                    warn!("Skipping row {}: unknown record_type", row_num + 2);
                    continue;
                }
            };

            match record_type {
                RecordType::Observation => match self.parse_observation(&row) {
                    Ok(obs) => self.observations.push(obs),
                    Err(e) => warn!("Skipping observation row {}: {}", row_num + 2, e),
                },
                RecordType::Event => match self.parse_event(&row) {
                    Ok(event) => self.events.push(event),
                    Err(e) => warn!("Skipping event row {}: {}", row_num + 2, e),
                },
                RecordType::Target => match self.parse_target(&row) {
                    Ok(target) => self.targets.push(target),
                    Err(e) => warn!("Skipping target row {}: {}", row_num + 2, e),
                },
            }
        }

        Ok(())
    }

    fn parse_observation(&self, row: &Row<'_>) -> Result<Observation> {
        Ok(Observation {
            record_id: row.require("record_id")?.to_string(),
            pillar: row.optional("pillar"),
            indicator: row.require("indicator")?.to_string(),
            indicator_code: row.require("indicator_code")?.to_string(),
            value: parse_value(row.require("value_numeric")?)?,
            date: parse_date(row.require("observation_date")?)?,
            source_type: row.optional("source_type"),
            source_name: row.optional("source_name"),
            confidence: row.confidence(),
        })
    }

    fn parse_event(&self, row: &Row<'_>) -> Result<Event> {
        let category = row
            .require("category")?
            .parse::<EventCategory>()
            .map_err(Error::InvalidData)?;
        Ok(Event {
            record_id: row.require("record_id")?.to_string(),
            category,
            // Events carry their name in the indicator column of the unified schema
            name: row.require("indicator")?.to_string(),
            date: parse_date(row.require("observation_date")?)?,
            source_name: row.optional("source_name"),
            confidence: row.confidence(),
            notes: row.optional("notes"),
        })
    }

    fn parse_target(&self, row: &Row<'_>) -> Result<Target> {
        let raw_code = row.require("indicator_code")?;
        // Targets are coded TGT_<indicator>; strip the prefix so lookups
        // against observation codes work directly
        let indicator_code = raw_code.strip_prefix("TGT_").unwrap_or(raw_code);
        Ok(Target {
            record_id: row.require("record_id")?.to_string(),
            pillar: row.optional("pillar"),
            indicator: row.require("indicator")?.to_string(),
            indicator_code: indicator_code.to_string(),
            value: parse_value(row.require("value_numeric")?)?,
            date: parse_date(row.require("observation_date")?)?,
            source_name: row.optional("source_name"),
            confidence: row.confidence(),
        })
    }

    /// Parse the impact links file
    fn read_impacts<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        for (row_num, result) in rdr.records().enumerate() {
            let record = result?;
            let row = Row::new(&headers, &record);

            match Self::parse_impact(&row) {
                Ok(link) => self.impacts.push(link),
                Err(e) => warn!("Skipping impact row {}: {}", row_num + 2, e),
            }
        }

        Ok(())
    }

    fn parse_impact(row: &Row<'_>) -> Result<ImpactLink> {
        // Estimate and lag default to 0 when blank or unparseable
        let estimate_pp = row
            .get("impact_estimate")
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);
        let lag_months = row
            .get("lag_months")
            .and_then(|s| s.parse::<f64>().ok())
            .map(|f| f.max(0.0) as u32)
            .unwrap_or(0);

        Ok(ImpactLink {
            link_id: row.require("link_id")?.to_string(),
            parent_id: row.require("parent_id")?.to_string(),
            indicator_code: row.require("indicator")?.to_string(),
            direction: row
                .get("impact_direction")
                .and_then(|s| s.parse().ok())
                .unwrap_or(ImpactDirection::Positive),
            magnitude: row
                .get("impact_magnitude")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            estimate_pp,
            lag_months,
            evidence_basis: row.optional("evidence_basis"),
            evidence_source: row.optional("evidence_source"),
            confidence: row.confidence(),
            notes: row.optional("notes"),
        })
    }

    /// Observations for one indicator, in date order
    pub fn observations_for(&self, indicator_code: &str) -> Vec<&Observation> {
        self.observations
            .iter()
            .filter(|o| o.indicator_code == indicator_code)
            .collect()
    }

    /// Unique indicator codes in first-seen order
    pub fn indicator_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for obs in &self.observations {
            if !codes.iter().any(|c| c == &obs.indicator_code) {
                codes.push(obs.indicator_code.clone());
            }
        }
        codes
    }

    /// Most recent observation for an indicator
    pub fn latest_observation(&self, indicator_code: &str) -> Option<&Observation> {
        self.observations_for(indicator_code).into_iter().last()
    }

    /// Look up an event by record id
    pub fn event(&self, record_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.record_id == record_id)
    }

    /// Impact links belonging to one event
    pub fn impacts_for_event(&self, event_id: &str) -> Vec<&ImpactLink> {
        self.impacts
            .iter()
            .filter(|i| i.parent_id == event_id)
            .collect()
    }

    /// Impact links affecting one indicator
    pub fn impacts_on_indicator(&self, indicator_code: &str) -> Vec<&ImpactLink> {
        self.impacts
            .iter()
            .filter(|i| i.indicator_code == indicator_code)
            .collect()
    }

    /// Targets for one indicator
    pub fn targets_for(&self, indicator_code: &str) -> Vec<&Target> {
        self.targets
            .iter()
            .filter(|t| t.indicator_code == indicator_code)
            .collect()
    }

    /// Date range covered by the observations
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// Header-indexed view of one CSV record
struct Row<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    fn new(headers: &'a StringRecord, record: &'a StringRecord) -> Self {
        Self { headers, record }
    }

    /// Non-empty value of a named column, if present
    fn get(&self, name: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == name)?;
        self.record.get(idx).map(str::trim).filter(|s| !s.is_empty())
    }

    fn require(&self, name: &str) -> Result<&'a str> {
        self.get(name)
            .ok_or_else(|| Error::InvalidData(format!("Missing {}", name)))
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    fn confidence(&self) -> Confidence {
        self.get("confidence")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Parse a date string in common formats
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-06-30
        "%m/%d/%Y", // 06/30/2024
        "%d/%m/%Y", // 30/06/2024 (European)
        "%Y/%m/%d", // 2024/06/30
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::InvalidData(format!("Unable to parse date: {}", s)))
}

/// Parse a numeric value, tolerating thousands separators
fn parse_value(s: &str) -> Result<f64> {
    let cleaned: String = s.trim().replace([',', ' '], "");
    cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidData(format!("Unable to parse value: {}", s)))
}
