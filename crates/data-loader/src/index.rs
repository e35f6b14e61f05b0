//! Loading a `TourismData` snapshot from a dataset directory.
//!
//! Steps:
//! 1. Parse the three CSV files concurrently
//! 2. Insert every row (which maintains the secondary indices)
//! 3. Validate integrity of the events table

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Parse one table, treating an absent file as an empty table.
fn load_table<T>(path: &Path, parse: fn(&Path) -> Result<Vec<T>>) -> Result<Vec<T>> {
    if !path.exists() {
        warn!("Dataset file {} not found, using an empty table", path.display());
        return Ok(Vec::new());
    }
    parse(path)
}

impl TourismData {
    /// Load bookings, events and weather from `data_dir`.
    ///
    /// Missing files yield empty tables; a file that exists but cannot be
    /// parsed is an error.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading tourism snapshots from {}", data_dir.display());

        let stays_path = data_dir.join(parser::STAYS_FILE);
        let events_path = data_dir.join(parser::EVENTS_FILE);
        let weather_path = data_dir.join(parser::WEATHER_FILE);

        // Stays dominate the load time, so they get their own branch
        let (stays, (events, weather)) = rayon::join(
            || load_table(&stays_path, parser::parse_stays),
            || {
                rayon::join(
                    || load_table(&events_path, parser::parse_events),
                    || load_table(&weather_path, parser::parse_weather),
                )
            },
        );
        let stays = stays?;
        let events = events?;
        let weather = weather?;

        info!(
            "Loaded {} stays, {} events, {} weather days",
            stays.len(),
            events.len(),
            weather.len()
        );

        let data = Self::from_records(stays, events, weather);
        data.validate()?;
        Ok(data)
    }

    /// Build a snapshot from already-parsed rows.
    pub fn from_records(
        stays: Vec<StayRecord>,
        events: Vec<Event>,
        weather: Vec<WeatherRecord>,
    ) -> Self {
        let mut data = TourismData::new();
        data.stays.reserve(stays.len());
        for stay in stays {
            data.insert_stay(stay);
        }
        for event in events {
            data.insert_event(event);
        }
        for record in weather {
            data.insert_weather(record);
        }
        data
    }

    /// Validate data integrity
    ///
    /// Event ids must be unique; everything else in the snapshot is allowed
    /// to be sparse.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.events.len());
        for event in &self.events {
            if !seen.insert(event.event_id) {
                return Err(DataLoadError::DuplicateEventId { id: event.event_id });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_missing_files_load_as_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let data = TourismData::load_from_dir(dir.path()).unwrap();
        assert_eq!(data.counts(), (0, 0, 0, 0));
    }

    #[test]
    fn test_load_partial_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(parser::EVENTS_FILE),
            "event_id,date,type,name,location,expected_attendance\n\
             1,2024-06-01,concert,Jazz Night,Paradiso,500\n\
             2,2024-06-01,sports,Marathon Race,Olympic Stadium,45000\n",
        )
        .unwrap();

        let data = TourismData::load_from_dir(dir.path()).unwrap();
        let (stays, guests, events, weather) = data.counts();
        assert_eq!((stays, guests, events, weather), (0, 0, 2, 0));
        assert_eq!(data.get_events_on(date(1)).len(), 2);
        assert_eq!(data.get_event(2).unwrap().name, "Marathon Race");
    }

    #[test]
    fn test_duplicate_event_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(parser::EVENTS_FILE),
            "event_id,date,type,name,location,expected_attendance\n\
             5,2024-06-01,concert,Jazz Night,Paradiso,500\n\
             5,2024-06-02,concert,Rock Concert,Melkweg,900\n",
        )
        .unwrap();

        let result = TourismData::load_from_dir(dir.path());
        assert!(matches!(result, Err(DataLoadError::DuplicateEventId { id: 5 })));
    }

    #[test]
    fn test_from_records_builds_indices() {
        let stays = vec![
            StayRecord::new(3, date(1)),
            StayRecord::new(1, date(2)),
            StayRecord::new(3, date(2)),
        ];
        let data = TourismData::from_records(stays, vec![], vec![WeatherRecord::new(date(1))]);

        assert_eq!(data.guest_ids(), vec![1, 3]);
        assert_eq!(data.get_guest_stays(3).len(), 2);
        assert_eq!(data.get_stays_on(date(2)).len(), 2);
        assert!(data.get_weather(date(1)).is_some());
        assert!(data.get_weather(date(2)).is_none());
    }
}
