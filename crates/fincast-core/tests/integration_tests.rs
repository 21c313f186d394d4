//! Integration tests for fincast-core
//!
//! These tests exercise the full sample → load → trend → impacts → scenarios
//! → export workflow on the Ethiopia reference dataset.

use chrono::Datelike;

use fincast_core::{
    config::ForecastConfig,
    dataset::Dataset,
    impact::ImpactModel,
    report::{scenario_rows, write_forecast, ForecastRow},
    sample::{self, IMPACTS_FILE, RECORDS_FILE},
    scenario::{self, Scenario},
    trend::TrendModel,
};

fn load_sample_from_disk() -> Dataset {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    sample::write_sample_csvs(dir.path()).expect("Failed to write sample CSVs");
    Dataset::load(
        &dir.path().join(RECORDS_FILE),
        &dir.path().join(IMPACTS_FILE),
    )
    .expect("Failed to load sample CSVs")
}

#[test]
fn test_full_forecast_workflow() {
    let dataset = load_sample_from_disk();
    let config = ForecastConfig::default();

    // Fit the account-ownership trend on the Findex waves
    let history = dataset.observations_for("ACC_OWNERSHIP");
    assert_eq!(history.len(), 5);

    let model = TrendModel::fit("ACC_OWNERSHIP", &history).expect("Trend fit failed");
    let annual = model.annual_slope();
    assert!(
        annual > 2.0 && annual < 2.8,
        "Unexpected annual slope {annual}"
    );

    // Project the four years after the last observation (2024)
    let last_year = history.last().unwrap().date.year();
    let years = config.forecast_years(last_year);
    assert_eq!(years, vec![2025, 2026, 2027, 2028]);

    let baseline = model
        .baseline(&years, config.anchor_month, config.anchor_day)
        .expect("Baseline projection failed");
    assert_eq!(baseline.len(), 4);

    // Continued growth past the 2024 level of 49.0
    assert!(baseline[0].value > 49.0);
    assert!(baseline[3].value > baseline[0].value);

    // Scenario generation over the same baseline
    let points = scenario::generate_all(&dataset, &baseline, "ACC_OWNERSHIP", &config)
        .expect("Scenario generation failed");
    assert_eq!(points.len(), 12);

    // Two positive links hit ACC_OWNERSHIP before mid-2025 (EthSwitch +1.5pp,
    // NBE strategy +2.0pp), so every base point sits 3.5pp above baseline
    let base_2025 = points
        .iter()
        .find(|p| p.scenario == Scenario::Base && p.date.year() == 2025)
        .unwrap();
    assert!((base_2025.value - baseline[0].value - 3.5).abs() < 1e-9);

    let optimistic_2025 = points
        .iter()
        .find(|p| p.scenario == Scenario::Optimistic && p.date.year() == 2025)
        .unwrap();
    assert!((optimistic_2025.value - baseline[0].value - 3.5 * 1.3).abs() < 1e-9);

    let pessimistic_2025 = points
        .iter()
        .find(|p| p.scenario == Scenario::Pessimistic && p.date.year() == 2025)
        .unwrap();
    assert!((pessimistic_2025.value - baseline[0].value - 3.5 * 0.7).abs() < 1e-9);

    // Only the base scenario carries a confidence band, clamped to [0, 100]
    for point in &points {
        if point.scenario == Scenario::Base {
            let lower = point.ci_lower.expect("Base point missing lower band");
            let upper = point.ci_upper.expect("Base point missing upper band");
            assert!(lower < point.value && point.value < upper);
            assert!(lower >= 0.0 && upper <= 100.0);
        } else {
            assert!(point.ci_lower.is_none() && point.ci_upper.is_none());
        }
    }
}

#[test]
fn test_metrics_against_nfis_target() {
    let dataset = load_sample_from_disk();
    let config = ForecastConfig::default();

    let history = dataset.observations_for("ACC_OWNERSHIP");
    let model = TrendModel::fit("ACC_OWNERSHIP", &history).unwrap();
    let years = config.forecast_years(2024);
    let baseline = model
        .baseline(&years, config.anchor_month, config.anchor_day)
        .unwrap();
    let points = scenario::generate_all(&dataset, &baseline, "ACC_OWNERSHIP", &config).unwrap();

    let target = dataset.targets_for("ACC_OWNERSHIP")[0];
    assert_eq!(target.value, 60.0);

    let metrics =
        scenario::forecast_metrics(&points, Some(target.value)).expect("Metrics failed");
    assert_eq!(metrics.indicator_code, "ACC_OWNERSHIP");
    assert_eq!(metrics.forecast_years, vec![2025, 2026, 2027, 2028]);
    assert!(metrics.best_case > metrics.final_forecast);
    assert!(metrics.worst_case < metrics.final_forecast);

    // Trend plus impacts clears the 60% NFIS-II target by 2028
    assert!(metrics.final_forecast > 60.0);
    assert!(metrics.gap_to_target.unwrap() < 0.0);
    assert_eq!(metrics.on_track, Some(true));
}

#[test]
fn test_impact_model_over_sample() {
    let dataset = load_sample_from_disk();
    let model = ImpactModel::new(&dataset);

    let summary = model.summary();
    assert_eq!(summary.len(), 8);
    // Summary rows are in event-date order; Telebirr launch comes first
    assert_eq!(summary[0].event, "Telebirr Launch");

    let matrix = model.matrix();
    assert_eq!(matrix.events.len(), 5);
    assert_eq!(matrix.indicators.len(), 3);

    // Telebirr launch predicted +4pp on mobile money accounts; observed
    // Findex change annualizes well below that
    let validation = model
        .validate_link("EVT_001", "ACC_MM_ACCOUNT")
        .expect("Validation failed");
    assert_eq!(validation.predicted_pp, 4.0);
    assert!((validation.observed_change - 4.75).abs() < 1e-9);
    assert!(validation.annualized_change < 2.0);
}

#[test]
fn test_forecast_export_roundtrip() {
    let dataset = load_sample_from_disk();
    let config = ForecastConfig::default();

    let history = dataset.observations_for("USG_DIGITAL_PAYMENT");
    let model = TrendModel::fit("USG_DIGITAL_PAYMENT", &history).unwrap();
    let baseline = model
        .baseline(&config.forecast_years(2024), config.anchor_month, config.anchor_day)
        .unwrap();
    let points =
        scenario::generate_all(&dataset, &baseline, "USG_DIGITAL_PAYMENT", &config).unwrap();

    let mut rows: Vec<ForecastRow> = baseline.iter().map(ForecastRow::from_baseline).collect();
    rows.extend(scenario_rows(&points));

    let mut buf = Vec::new();
    write_forecast(&mut buf, &rows).expect("CSV export failed");
    let out = String::from_utf8(buf).unwrap();

    assert_eq!(
        out.lines().next().unwrap(),
        "indicator_code,observation_date,value_numeric,kind,scenario,ci_lower,ci_upper"
    );
    // 4 baseline rows, then 12 scenario rows
    assert_eq!(out.lines().count(), 17);
    assert_eq!(out.matches("baseline_forecast").count(), 4);
    assert_eq!(out.matches("adjusted_forecast").count(), 12);
}

#[test]
fn test_every_sample_indicator_fits() {
    let dataset = load_sample_from_disk();
    let config = ForecastConfig::default();

    for code in dataset.indicator_codes() {
        let history = dataset.observations_for(&code);
        assert!(
            history.len() >= config.min_observations,
            "Sample indicator {code} has too few observations"
        );
        let model = TrendModel::fit(&code, &history)
            .unwrap_or_else(|e| panic!("Trend fit failed for {code}: {e}"));
        assert!(model.n >= 2);
    }
}
