//! Forecasting over daily features.
//!
//! The `Forecaster` trait is the seam for any time-series model; the
//! seasonal-naive baseline predicts each future day from the same weekday
//! in the most recent weeks of history.

use crate::features::DailyFeatures;
use anyhow::{bail, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which daily series to forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastTarget {
    Demand,
    Revpar,
}

impl ForecastTarget {
    pub fn value_of(&self, row: &DailyFeatures) -> f64 {
        match self {
            ForecastTarget::Demand => row.demand,
            ForecastTarget::Revpar => row.revpar,
        }
    }
}

impl FromStr for ForecastTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "demand" => Ok(ForecastTarget::Demand),
            "revpar" => Ok(ForecastTarget::Revpar),
            other => bail!("unknown forecast target '{}' (expected demand or revpar)", other),
        }
    }
}

/// One predicted day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
}

pub trait Forecaster: Send + Sync {
    fn name(&self) -> &str;

    /// Predict `periods` days following the last history date.
    fn forecast(
        &self,
        history: &[DailyFeatures],
        target: ForecastTarget,
        periods: usize,
    ) -> Vec<ForecastPoint>;
}

/// Same-weekday mean over the trailing `window_weeks` weeks.
#[derive(Debug, Clone)]
pub struct SeasonalNaiveForecaster {
    window_weeks: u32,
}

impl SeasonalNaiveForecaster {
    pub fn new() -> Self {
        Self { window_weeks: 4 }
    }

    /// Configure the trailing window (default: 4 weeks)
    pub fn with_window_weeks(mut self, weeks: u32) -> Self {
        self.window_weeks = weeks.max(1);
        self
    }
}

impl Default for SeasonalNaiveForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for SeasonalNaiveForecaster {
    fn name(&self) -> &str {
        "SeasonalNaive"
    }

    fn forecast(
        &self,
        history: &[DailyFeatures],
        target: ForecastTarget,
        periods: usize,
    ) -> Vec<ForecastPoint> {
        let Some(last) = history.iter().map(|row| row.date).max() else {
            return Vec::new();
        };
        let cutoff = last
            .checked_sub_days(Days::new(u64::from(self.window_weeks) * 7))
            .unwrap_or(NaiveDate::MIN);

        let mut by_weekday = [(0.0, 0usize); 7];
        let (mut total, mut count) = (0.0, 0usize);
        for row in history.iter().filter(|row| row.date > cutoff) {
            let value = target.value_of(row);
            let slot = &mut by_weekday[row.date.weekday().num_days_from_monday() as usize];
            slot.0 += value;
            slot.1 += 1;
            total += value;
            count += 1;
        }
        let overall = if count > 0 { total / count as f64 } else { 0.0 };

        (1..=periods as u64)
            .map_while(|offset| last.checked_add_days(Days::new(offset)))
            .map(|ds| {
                let (sum, n) = by_weekday[ds.weekday().num_days_from_monday() as usize];
                let yhat = if n > 0 { sum / n as f64 } else { overall };
                ForecastPoint { ds, yhat }
            })
            .collect()
    }
}
