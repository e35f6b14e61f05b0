//! Integration tests for the pipeline.
//!
//! These tests run the filters, feature builder, forecaster and impact
//! report together over one small snapshot.

use chrono::{Days, NaiveDate};
use data_loader::{Event, StayRecord, TourismData, WeatherRecord};
use pipeline::filters::*;
use pipeline::{
    build_daily_features, measure_impact, FilterPipeline, ForecastTarget, Forecaster,
    SeasonalNaiveForecaster,
};

fn day(d: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + Days::new(d)
}

fn create_test_setup() -> TourismData {
    let mut stays = Vec::new();
    let mut weather = Vec::new();
    for d in 0..21 {
        for guest in 0..(1 + d % 3) as u32 {
            let mut stay = StayRecord::new(guest, day(d));
            stay.rooms_booked = Some(1 + guest);
            stay.revenue_available_room = Some(9_000.0);
            stay.accommodation_units = Some(3);
            stays.push(stay);
        }
        let mut record = WeatherRecord::new(day(d));
        record.temperature_max = Some(18.0 + d as f64 / 2.0);
        record.precipitation = Some(if d % 4 == 0 { 2.0 } else { 0.0 });
        weather.push(record);
    }

    let events = vec![
        Event::new(1, day(2), "concert", "Jazz Night", "Paradiso", 500),
        Event::new(2, day(5), "concert", "Jazz Night", "Bimhuis", 300),
        Event::new(3, day(5), "festival", "Food Festival", "NDSM", 4_000),
        Event::new(4, day(9), "sports", "City Marathon", "Vondelpark", 12_000),
        Event::new(5, day(30), "exhibition", "Van Gogh Late", "Museumplein", 800),
    ];

    TourismData::from_records(stays, events, weather)
}

#[test]
fn test_window_then_blend_filters() {
    let data = create_test_setup();

    let window = DateWindow::resolve(day(0), Some(day(1)), Some(day(10)), 30);
    let windowed = FilterPipeline::new()
        .add_filter(DateWindowFilter::new(window))
        .apply(data.events().to_vec())
        .unwrap();
    assert_eq!(windowed.len(), 4);

    // Reverse-date input to show the final ordering is by date
    let mut merged = windowed;
    merged.reverse();
    let result = FilterPipeline::new()
        .add_filter(UniqueNameFilter)
        .add_filter(TruncateFilter::new(3))
        .add_filter(DateOrderFilter)
        .apply(merged)
        .unwrap();

    let ids: Vec<u32> = result.iter().map(|e| e.event_id).collect();
    // Reversed: 4, 3, 2, 1 -> event 1 duplicates "Jazz Night" of event 2
    assert_eq!(ids, vec![3, 2, 4]);
    assert!(result.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn test_features_feed_forecaster() {
    let data = create_test_setup();
    let features = build_daily_features(&data);
    assert_eq!(features.len(), 21);
    assert_eq!(features[5].event_intensity, 4_300);
    assert_eq!(features[0].rain_flag, 1);

    let forecaster = SeasonalNaiveForecaster::new();
    let demand = forecaster.forecast(&features, ForecastTarget::Demand, 14);
    assert_eq!(demand.len(), 14);
    assert_eq!(demand[0].ds, day(21));
    assert!(demand.iter().all(|p| p.yhat > 0.0));

    let revpar = forecaster.forecast(&features, ForecastTarget::Revpar, 3);
    assert!(revpar.iter().all(|p| (p.yhat - 3_000.0).abs() < 1e-9));
}

#[test]
fn test_impact_on_event_dates() {
    let data = create_test_setup();
    let recommendations: Vec<Event> = data.events()[..3].to_vec();

    let report = measure_impact(data.stays(), &recommendations);
    // Days 2 and 5 carry 3 stays each
    assert_eq!(report.conversion_rate, 2.0);
    assert!(report.avg_bookings_with_recommendations > 0.0);
    assert!(report.avg_bookings_without_recommendations > 0.0);
}
