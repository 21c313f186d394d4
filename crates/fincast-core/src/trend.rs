//! Baseline trend fitting
//!
//! Ordinary least-squares regression of indicator values against calendar
//! time (ordinal day number), projected forward to mid-year anchor dates.
//! Findex-style series are sparse and irregular, so the fit works on dates
//! rather than assuming evenly spaced samples.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Observation;

/// One projected value for an indicator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub indicator_code: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// A fitted linear trend for one indicator
#[derive(Debug, Clone)]
pub struct TrendModel {
    pub indicator_code: String,
    /// Change in value per day
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Standard deviation of the fit residuals
    pub residual_std: f64,
    /// Number of observations used
    pub n: usize,
}

impl TrendModel {
    /// Fit a least-squares line through an indicator's observations.
    ///
    /// Requires at least two observations on at least two distinct dates.
    pub fn fit(indicator_code: &str, observations: &[&Observation]) -> Result<Self> {
        if observations.len() < 2 {
            return Err(Error::Forecast(format!(
                "Not enough observations to fit a trend for {} ({} found, 2 required)",
                indicator_code,
                observations.len()
            )));
        }

        let points: Vec<(f64, f64)> = observations
            .iter()
            .map(|o| (ordinal_day(o.date), o.value))
            .collect();

        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let sxx: f64 = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
        let sxy: f64 = points
            .iter()
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum();

        if sxx == 0.0 {
            return Err(Error::Forecast(format!(
                "All observations for {} fall on the same date",
                indicator_code
            )));
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let ss_res: f64 = points
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let ss_tot: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();

        // A flat series fits itself exactly
        let r_squared = if ss_tot == 0.0 {
            1.0
        } else {
            1.0 - ss_res / ss_tot
        };

        let residual_std = if points.len() > 2 {
            (ss_res / (points.len() as f64 - 2.0)).sqrt()
        } else {
            0.0
        };

        debug!(
            "Fitted trend for {}: slope {:.4}pp/yr, r² {:.3}, n {}",
            indicator_code,
            slope * 365.25,
            r_squared,
            points.len()
        );

        Ok(Self {
            indicator_code: indicator_code.to_string(),
            slope,
            intercept,
            r_squared,
            residual_std,
            n: points.len(),
        })
    }

    /// Evaluate the fitted line at a date
    pub fn predict(&self, date: NaiveDate) -> f64 {
        self.intercept + self.slope * ordinal_day(date)
    }

    /// Annualized slope in value units per year
    pub fn annual_slope(&self) -> f64 {
        self.slope * 365.25
    }

    /// Project the trend to one anchor date per requested year
    pub fn baseline(
        &self,
        years: &[i32],
        anchor_month: u32,
        anchor_day: u32,
    ) -> Result<Vec<ForecastPoint>> {
        let mut points = Vec::with_capacity(years.len());
        for &year in years {
            let date = NaiveDate::from_ymd_opt(year, anchor_month, anchor_day).ok_or_else(
                || {
                    Error::Forecast(format!(
                        "Invalid forecast anchor {}-{:02}-{:02}",
                        year, anchor_month, anchor_day
                    ))
                },
            )?;
            points.push(ForecastPoint {
                indicator_code: self.indicator_code.clone(),
                date,
                value: self.predict(date),
            });
        }
        Ok(points)
    }
}

/// Days since the common era, as a regression-friendly float
fn ordinal_day(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}
