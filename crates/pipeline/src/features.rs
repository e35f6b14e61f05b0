//! Daily demand features for forecasting.
//!
//! Stay rows are aggregated into one row per calendar date and joined with
//! event intensity and weather for that date.

use chrono::{Datelike, NaiveDate};
use data_loader::TourismData;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Aggregated features for one stay date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFeatures {
    pub date: NaiveDate,
    /// Sum of rooms booked
    pub rooms_sold: u64,
    /// Revenue per available room: summed revenue over summed units
    pub revpar: f64,
    /// Forecast target, equal to `rooms_sold`
    pub demand: f64,
    /// Total expected attendance of events on this date
    pub event_intensity: u64,
    /// 1 when it rained, else 0
    pub rain_flag: u8,
    pub temperature_max: f64,
    pub month: u32,
}

#[derive(Default)]
struct DayTotals {
    rooms: u64,
    revenue: f64,
    units: u64,
}

/// Build one feature row per distinct stay date, ascending.
#[instrument(skip(data), fields(stays = data.stays().len()))]
pub fn build_daily_features(data: &TourismData) -> Vec<DailyFeatures> {
    let mut per_day: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for stay in data.stays() {
        let totals = per_day.entry(stay.date).or_default();
        totals.rooms += u64::from(stay.rooms());
        totals.revenue += stay.revenue_available_room.unwrap_or(0.0);
        totals.units += u64::from(stay.accommodation_units.unwrap_or(0));
    }

    let mut temperatures: Vec<Option<f64>> = Vec::with_capacity(per_day.len());
    let mut rows: Vec<DailyFeatures> = per_day
        .into_iter()
        .map(|(date, totals)| {
            let event_intensity = data
                .get_events_on(date)
                .iter()
                .map(|event| event.expected_attendance)
                .sum();
            let weather = data.get_weather(date);
            let rain_flag = weather
                .and_then(|w| w.precipitation)
                .map_or(0, |p| u8::from(p > 0.0));
            temperatures.push(weather.and_then(|w| w.temperature_max));

            let revpar = if totals.units > 0 {
                totals.revenue / totals.units as f64
            } else {
                0.0
            };

            DailyFeatures {
                date,
                rooms_sold: totals.rooms,
                revpar,
                demand: totals.rooms as f64,
                event_intensity,
                rain_flag,
                temperature_max: 0.0,
                month: date.month(),
            }
        })
        .collect();

    let present: Vec<f64> = temperatures.iter().flatten().copied().collect();
    let fill = if present.is_empty() {
        0.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    };
    for (row, temperature) in rows.iter_mut().zip(temperatures) {
        row.temperature_max = temperature.unwrap_or(fill);
    }

    debug!(
        "Built {} daily feature rows ({} with observed temperature)",
        rows.len(),
        present.len()
    );
    rows
}
