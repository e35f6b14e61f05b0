//! # Data Loader Crate
//!
//! Loads the city tourism snapshots (guest stays, events, weather) from
//! delimited text files and indexes them in memory.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (StayRecord, Event, WeatherRecord, TourismData)
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Load a whole directory and validate it
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::TourismData;
//! use std::path::Path;
//!
//! let data = TourismData::load_from_dir(Path::new("datasets"))?;
//! let stays = data.get_guest_stays(42);
//! println!("Guest 42 has {} stays", stays.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    GuestId,
    EventId,
    // Core types
    StayRecord,
    Event,
    WeatherRecord,
    TourismData,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_data_creation() {
        let data = TourismData::new();
        assert_eq!(data.counts(), (0, 0, 0, 0));
    }

    #[test]
    fn test_insert_stay() {
        let mut data = TourismData::new();

        let mut stay = StayRecord::new(1, date(2024, 6, 1));
        stay.rooms_booked = Some(2);
        stay.age = Some(34.0);
        data.insert_stay(stay);
        data.insert_stay(StayRecord::new(1, date(2024, 6, 3)));

        let stays = data.get_guest_stays(1);
        assert_eq!(stays.len(), 2);
        assert_eq!(stays[0].rooms(), 2);
        assert_eq!(stays[1].rooms(), 0);
        assert_eq!(data.get_guest_stay_dates(1).len(), 2);
        assert!(data.has_guest(1));
    }

    #[test]
    fn test_insert_event() {
        let mut data = TourismData::new();
        data.insert_event(Event::new(
            7,
            date(2024, 6, 1),
            "concert",
            "Jazz Night",
            "Paradiso, Amsterdam",
            500,
        ));

        let event = data.get_event(7).unwrap();
        assert_eq!(event.text(), "concert Jazz Night Paradiso, Amsterdam");
        assert_eq!(data.get_events_on(date(2024, 6, 1)).len(), 1);
    }

    #[test]
    fn test_empty_queries() {
        let data = TourismData::new();

        assert!(data.get_guest_stays(999).is_empty());
        assert!(data.get_guest_stay_dates(999).is_empty());
        assert!(data.get_events_on(date(2024, 1, 1)).is_empty());
        assert!(data.get_event(999).is_none());
        assert!(data.guest_ids().is_empty());
    }
}
