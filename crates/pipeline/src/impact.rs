//! Booking impact of recommended event dates.
//!
//! Compares rooms booked on dates that carry a recommended event with
//! rooms booked on every other date.

use chrono::NaiveDate;
use data_loader::{Event, StayRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Summary record consumed by reporting layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Stays on recommended dates per recommendation
    pub conversion_rate: f64,
    pub avg_bookings_with_recommendations: f64,
    pub avg_bookings_without_recommendations: f64,
    /// Signed percentage change of "with" over "without"
    pub improvement: f64,
}

/// Mean of the non-missing `rooms_booked` values, 0 when there are none.
fn mean_rooms<'a>(stays: impl Iterator<Item = &'a StayRecord>) -> f64 {
    let (sum, count) = stays
        .filter_map(|stay| stay.rooms_booked)
        .fold((0u64, 0u64), |(sum, count), rooms| (sum + u64::from(rooms), count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

pub fn measure_impact(stays: &[StayRecord], recommendations: &[Event]) -> ImpactReport {
    if recommendations.is_empty() {
        return ImpactReport {
            conversion_rate: 0.0,
            avg_bookings_with_recommendations: 0.0,
            avg_bookings_without_recommendations: mean_rooms(stays.iter()),
            improvement: 0.0,
        };
    }

    let recommended_dates: HashSet<NaiveDate> =
        recommendations.iter().map(|event| event.date).collect();
    let (with, without): (Vec<&StayRecord>, Vec<&StayRecord>) = stays
        .iter()
        .partition(|stay| recommended_dates.contains(&stay.date));

    let avg_with = mean_rooms(with.iter().copied());
    let avg_without = mean_rooms(without.iter().copied());
    let improvement = if avg_without > 0.0 {
        (avg_with - avg_without) / avg_without * 100.0
    } else {
        0.0
    };

    ImpactReport {
        conversion_rate: with.len() as f64 / recommendations.len() as f64,
        avg_bookings_with_recommendations: avg_with,
        avg_bookings_without_recommendations: avg_without,
        improvement,
    }
}
