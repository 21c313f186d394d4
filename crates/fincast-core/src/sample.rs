//! Reference sample dataset
//!
//! Builds the Ethiopia financial-inclusion dataset used by the docs, the
//! `sample` CLI command, and the integration tests: Findex survey waves,
//! operator user counts, five market events, two NFIS-II targets, and the
//! impact links connecting them.

use std::fs::{self, File};
use std::path::Path;

use chrono::NaiveDate;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::models::{
    Confidence, Event, EventCategory, ImpactDirection, ImpactLink, ImpactMagnitude, Observation,
    Target,
};

/// File name for the unified records CSV
pub const RECORDS_FILE: &str = "records.csv";
/// File name for the impact links CSV
pub const IMPACTS_FILE: &str = "impact_links.csv";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // All sample dates are static and valid
    NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date")
}

/// Build the sample dataset in memory
pub fn sample_dataset() -> Dataset {
    let mut observations = Vec::new();

    let mut push_obs = |pillar: &str,
                        indicator: &str,
                        code: &str,
                        points: &[(i32, u32, u32, f64)],
                        source_type: &str,
                        source_name: &str,
                        confidence: Confidence| {
        for &(y, m, d, value) in points {
            let record_id = format!("OBS_{:03}", observations.len() + 1);
            observations.push(Observation {
                record_id,
                pillar: Some(pillar.to_string()),
                indicator: indicator.to_string(),
                indicator_code: code.to_string(),
                value,
                date: date(y, m, d),
                source_type: Some(source_type.to_string()),
                source_name: Some(source_name.to_string()),
                confidence,
            });
        }
    };

    // Global Findex survey waves (percent of adults)
    push_obs(
        "Banking",
        "Account Ownership Rate",
        "ACC_OWNERSHIP",
        &[
            (2011, 6, 30, 14.0),
            (2014, 6, 30, 22.0),
            (2017, 6, 30, 35.0),
            (2021, 6, 30, 46.0),
            (2024, 6, 30, 49.0),
        ],
        "survey",
        "World Bank Global Findex",
        Confidence::High,
    );
    push_obs(
        "Digital Payments",
        "Mobile Money Account",
        "ACC_MM_ACCOUNT",
        &[
            (2014, 6, 30, 1.5),
            (2017, 6, 30, 4.7),
            (2021, 6, 30, 4.7),
            (2024, 6, 30, 9.45),
        ],
        "survey",
        "World Bank Global Findex",
        Confidence::High,
    );
    push_obs(
        "Digital Payments",
        "Digital Payment Usage",
        "USG_DIGITAL_PAYMENT",
        &[(2017, 6, 30, 15.0), (2021, 6, 30, 25.0), (2024, 6, 30, 35.0)],
        "survey",
        "World Bank Global Findex",
        Confidence::High,
    );

    // Operator disclosures (registered users, millions)
    push_obs(
        "Digital Payments",
        "Telebirr Users",
        "MM_TELEBIRR_USERS",
        &[
            (2021, 5, 15, 0.0),
            (2022, 6, 30, 20.0),
            (2023, 6, 30, 34.3),
            (2024, 6, 30, 54.84),
        ],
        "operator",
        "Ethio Telecom",
        Confidence::High,
    );
    push_obs(
        "Digital Payments",
        "M-Pesa Users",
        "MM_MPESA_USERS",
        &[
            (2023, 8, 10, 0.0),
            (2024, 3, 31, 3.1),
            (2024, 6, 30, 4.5),
            (2024, 12, 31, 10.8),
        ],
        "operator",
        "Safaricom Ethiopia",
        Confidence::High,
    );

    // Infrastructure context series
    push_obs(
        "Infrastructure",
        "Mobile Penetration",
        "INF_MOBILE_PEN",
        &[(2017, 12, 31, 44.0), (2021, 12, 31, 52.0), (2024, 12, 31, 58.0)],
        "operator",
        "ITU",
        Confidence::High,
    );
    push_obs(
        "Infrastructure",
        "4G Coverage",
        "INF_4G_COVERAGE",
        &[(2017, 12, 31, 25.0), (2021, 12, 31, 45.0), (2024, 12, 31, 65.0)],
        "operator",
        "GSMA",
        Confidence::Medium,
    );

    let mk_event = |id: &str, category: EventCategory, name: &str, d: NaiveDate, source: &str, notes: &str| Event {
        record_id: id.to_string(),
        category,
        name: name.to_string(),
        date: d,
        source_name: Some(source.to_string()),
        confidence: Confidence::High,
        notes: Some(notes.to_string()),
    };

    let events = vec![
        mk_event(
            "EVT_001",
            EventCategory::ProductLaunch,
            "Telebirr Launch",
            date(2021, 5, 15),
            "Ethio Telecom Press Release",
            "Major mobile money platform launch by state telecom",
        ),
        mk_event(
            "EVT_002",
            EventCategory::Policy,
            "Telecom Liberalization",
            date(2022, 8, 10),
            "National Bank of Ethiopia",
            "First private telecom operator license",
        ),
        mk_event(
            "EVT_003",
            EventCategory::ProductLaunch,
            "M-Pesa Launch",
            date(2023, 8, 10),
            "Safaricom Ethiopia",
            "Second major mobile money platform",
        ),
        mk_event(
            "EVT_004",
            EventCategory::Infrastructure,
            "EthSwitch Interoperability",
            date(2024, 1, 15),
            "EthSwitch",
            "Cross-platform transfers enabled",
        ),
        mk_event(
            "EVT_005",
            EventCategory::Policy,
            "NBE Digital Strategy",
            date(2023, 3, 1),
            "National Bank of Ethiopia",
            "Government commitment to digital finance",
        ),
    ];

    let targets = vec![
        Target {
            record_id: "TGT_001".to_string(),
            pillar: Some("Banking".to_string()),
            indicator: "Account Ownership Target".to_string(),
            indicator_code: "ACC_OWNERSHIP".to_string(),
            value: 60.0,
            date: date(2027, 12, 31),
            source_name: Some("NFIS-II".to_string()),
            confidence: Confidence::High,
        },
        Target {
            record_id: "TGT_002".to_string(),
            pillar: Some("Digital Payments".to_string()),
            indicator: "Digital Payment Target".to_string(),
            indicator_code: "DIGITAL_PAYMENT".to_string(),
            value: 50.0,
            date: date(2027, 12, 31),
            source_name: Some("NFIS-II".to_string()),
            confidence: Confidence::High,
        },
    ];

    let mk_link = |id: &str,
                   parent: &str,
                   code: &str,
                   magnitude: ImpactMagnitude,
                   estimate: f64,
                   lag: u32,
                   basis: &str,
                   source: &str,
                   confidence: Confidence| ImpactLink {
        link_id: id.to_string(),
        parent_id: parent.to_string(),
        indicator_code: code.to_string(),
        direction: ImpactDirection::Positive,
        magnitude,
        estimate_pp: estimate,
        lag_months: lag,
        evidence_basis: Some(basis.to_string()),
        evidence_source: Some(source.to_string()),
        confidence,
        notes: None,
    };

    let impacts = vec![
        mk_link(
            "IMP_001",
            "EVT_001",
            "ACC_MM_ACCOUNT",
            ImpactMagnitude::High,
            4.0,
            6,
            "comparable",
            "Kenya M-Pesa launch impact",
            Confidence::Medium,
        ),
        mk_link(
            "IMP_002",
            "EVT_001",
            "USG_DIGITAL_PAYMENT",
            ImpactMagnitude::Medium,
            5.0,
            12,
            "comparable",
            "Kenya M-Pesa usage patterns",
            Confidence::Medium,
        ),
        mk_link(
            "IMP_003",
            "EVT_003",
            "ACC_MM_ACCOUNT",
            ImpactMagnitude::Medium,
            2.0,
            6,
            "market",
            "Competitive market dynamics",
            Confidence::Medium,
        ),
        mk_link(
            "IMP_004",
            "EVT_003",
            "USG_DIGITAL_PAYMENT",
            ImpactMagnitude::Medium,
            3.0,
            12,
            "market",
            "Competition drives usage",
            Confidence::Medium,
        ),
        mk_link(
            "IMP_005",
            "EVT_004",
            "USG_DIGITAL_PAYMENT",
            ImpactMagnitude::High,
            4.0,
            3,
            "comparable",
            "Tanzania interoperability impact",
            Confidence::High,
        ),
        mk_link(
            "IMP_006",
            "EVT_004",
            "ACC_OWNERSHIP",
            ImpactMagnitude::Low,
            1.5,
            6,
            "comparable",
            "Reduced barriers to entry",
            Confidence::Low,
        ),
        mk_link(
            "IMP_007",
            "EVT_005",
            "ACC_OWNERSHIP",
            ImpactMagnitude::Medium,
            2.0,
            18,
            "policy",
            "Government commitment signal",
            Confidence::Low,
        ),
        mk_link(
            "IMP_008",
            "EVT_002",
            "ACC_MM_ACCOUNT",
            ImpactMagnitude::Low,
            1.0,
            12,
            "market",
            "Market preparation for competition",
            Confidence::Low,
        ),
    ];

    let mut dataset = Dataset {
        observations,
        events,
        targets,
        impacts,
    };
    dataset.observations.sort_by_key(|o| o.date);
    dataset.events.sort_by_key(|e| e.date);
    dataset
}

/// Write the sample dataset as the two CSV input files
pub fn write_sample_csvs(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let dataset = sample_dataset();

    let records_path = dir.join(RECORDS_FILE);
    let mut wtr = csv::Writer::from_writer(File::create(&records_path)?);
    wtr.write_record([
        "record_id",
        "record_type",
        "pillar",
        "category",
        "indicator",
        "indicator_code",
        "value_numeric",
        "observation_date",
        "source_type",
        "source_name",
        "confidence",
        "notes",
    ])?;
    for obs in &dataset.observations {
        wtr.write_record([
            obs.record_id.as_str(),
            "observation",
            obs.pillar.as_deref().unwrap_or(""),
            "",
            obs.indicator.as_str(),
            obs.indicator_code.as_str(),
            &obs.value.to_string(),
            &obs.date.format("%Y-%m-%d").to_string(),
            obs.source_type.as_deref().unwrap_or(""),
            obs.source_name.as_deref().unwrap_or(""),
            obs.confidence.as_str(),
            "",
        ])?;
    }
    for event in &dataset.events {
        wtr.write_record([
            event.record_id.as_str(),
            "event",
            "",
            event.category.as_str(),
            event.name.as_str(),
            "",
            "",
            &event.date.format("%Y-%m-%d").to_string(),
            "",
            event.source_name.as_deref().unwrap_or(""),
            event.confidence.as_str(),
            event.notes.as_deref().unwrap_or(""),
        ])?;
    }
    for target in &dataset.targets {
        wtr.write_record([
            target.record_id.as_str(),
            "target",
            target.pillar.as_deref().unwrap_or(""),
            "",
            target.indicator.as_str(),
            &format!("TGT_{}", target.indicator_code),
            &target.value.to_string(),
            &target.date.format("%Y-%m-%d").to_string(),
            "",
            target.source_name.as_deref().unwrap_or(""),
            target.confidence.as_str(),
            "",
        ])?;
    }
    wtr.flush()?;

    let impacts_path = dir.join(IMPACTS_FILE);
    let mut wtr = csv::Writer::from_writer(File::create(&impacts_path)?);
    wtr.write_record([
        "link_id",
        "parent_id",
        "indicator",
        "impact_direction",
        "impact_magnitude",
        "impact_estimate",
        "lag_months",
        "evidence_basis",
        "evidence_source",
        "confidence",
        "notes",
    ])?;
    for link in &dataset.impacts {
        wtr.write_record([
            link.link_id.as_str(),
            link.parent_id.as_str(),
            link.indicator_code.as_str(),
            link.direction.as_str(),
            link.magnitude.as_str(),
            &link.estimate_pp.to_string(),
            &link.lag_months.to_string(),
            link.evidence_basis.as_deref().unwrap_or(""),
            link.evidence_source.as_deref().unwrap_or(""),
            link.confidence.as_str(),
            link.notes.as_deref().unwrap_or(""),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}
