//! Core domain types for the tourism snapshots.
//!
//! Three tables back the whole system: guest stays (one row per
//! reservation), city events and daily weather. `TourismData` owns all three
//! and keeps a few secondary indices for the lookups the recommenders need.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a guest. Reused across stays of repeat visitors.
pub type GuestId = u32;

/// Identifier of an event, unique within the events table.
pub type EventId = u32;

// =============================================================================
// Records
// =============================================================================

/// One reservation row from `bookings.csv`.
///
/// Only `guest_id` and `date` are mandatory; every other column may be
/// blank in the source file and is read as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayRecord {
    pub guest_id: GuestId,
    /// Calendar date the stay row is attributed to
    pub date: NaiveDate,
    pub stars: Option<u8>,
    pub accommodation_units: Option<u32>,
    pub rooms_booked: Option<u32>,
    /// Nightly rate as stored in the snapshot (price * 100)
    pub average_daily_rate: Option<f64>,
    pub revenue_available_room: Option<f64>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub age: Option<f64>,
    pub country_id: Option<u32>,
    pub guest_country: Option<String>,
}

impl StayRecord {
    /// Create a stay with only the mandatory columns filled in.
    pub fn new(guest_id: GuestId, date: NaiveDate) -> Self {
        Self {
            guest_id,
            date,
            stars: None,
            accommodation_units: None,
            rooms_booked: None,
            average_daily_rate: None,
            revenue_available_room: None,
            arrival_date: None,
            departure_date: None,
            age: None,
            country_id: None,
            guest_country: None,
        }
    }

    /// Rooms booked, treating a blank cell as zero.
    pub fn rooms(&self) -> u32 {
        self.rooms_booked.unwrap_or(0)
    }
}

/// One row from `events.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    pub date: NaiveDate,
    /// Categorical type (concert, festival, ...)
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub expected_attendance: u64,
}

impl Event {
    pub fn new(
        event_id: EventId,
        date: NaiveDate,
        event_type: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        expected_attendance: u64,
    ) -> Self {
        Self {
            event_id,
            date,
            event_type: event_type.into(),
            name: name.into(),
            location: location.into(),
            expected_attendance,
        }
    }

    /// Free text used for content similarity: type, name and location
    /// joined by single spaces.
    pub fn text(&self) -> String {
        format!("{} {} {}", self.event_type, self.name, self.location)
    }
}

/// One row from `weather.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub weather_category: Option<String>,
    pub precipitation: Option<f64>,
    pub humidity: Option<f64>,
}

impl WeatherRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            temperature_max: None,
            temperature_min: None,
            weather_category: None,
            precipitation: None,
            humidity: None,
        }
    }
}

// =============================================================================
// TourismData - the in-memory snapshot
// =============================================================================

/// Holds the three tables plus secondary indices.
///
/// Rows keep their file order; indices store row positions so lookups hand
/// out borrowed records without copying.
#[derive(Debug, Clone)]
pub struct TourismData {
    pub(crate) stays: Vec<StayRecord>,
    pub(crate) events: Vec<Event>,
    pub(crate) weather: Vec<WeatherRecord>,

    /// Stay rows per guest, ordered by guest id
    pub(crate) guest_index: BTreeMap<GuestId, Vec<usize>>,
    /// Stay rows per calendar date
    pub(crate) stay_date_index: BTreeMap<NaiveDate, Vec<usize>>,
    /// Event rows per calendar date
    pub(crate) event_date_index: BTreeMap<NaiveDate, Vec<usize>>,
    /// Event row per event id
    pub(crate) event_id_index: HashMap<EventId, usize>,
    /// First weather row seen for each date
    pub(crate) weather_index: BTreeMap<NaiveDate, usize>,
}

impl TourismData {
    /// Creates a new, empty snapshot
    pub fn new() -> Self {
        Self {
            stays: Vec::new(),
            events: Vec::new(),
            weather: Vec::new(),
            guest_index: BTreeMap::new(),
            stay_date_index: BTreeMap::new(),
            event_date_index: BTreeMap::new(),
            event_id_index: HashMap::new(),
            weather_index: BTreeMap::new(),
        }
    }

    pub fn stays(&self) -> &[StayRecord] {
        &self.stays
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn weather(&self) -> &[WeatherRecord] {
        &self.weather
    }

    /// All stays of one guest, in file order. Empty for unknown guests.
    pub fn get_guest_stays(&self, guest_id: GuestId) -> Vec<&StayRecord> {
        self.guest_index
            .get(&guest_id)
            .map(|rows| rows.iter().map(|&i| &self.stays[i]).collect())
            .unwrap_or_default()
    }

    /// Distinct dates on which a guest has a stay row.
    pub fn get_guest_stay_dates(&self, guest_id: GuestId) -> BTreeSet<NaiveDate> {
        self.get_guest_stays(guest_id)
            .into_iter()
            .map(|stay| stay.date)
            .collect()
    }

    /// All stays attributed to a date.
    pub fn get_stays_on(&self, date: NaiveDate) -> Vec<&StayRecord> {
        self.stay_date_index
            .get(&date)
            .map(|rows| rows.iter().map(|&i| &self.stays[i]).collect())
            .unwrap_or_default()
    }

    /// All events held on a date.
    pub fn get_events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.event_date_index
            .get(&date)
            .map(|rows| rows.iter().map(|&i| &self.events[i]).collect())
            .unwrap_or_default()
    }

    pub fn get_event(&self, event_id: EventId) -> Option<&Event> {
        self.event_id_index.get(&event_id).map(|&i| &self.events[i])
    }

    pub fn get_weather(&self, date: NaiveDate) -> Option<&WeatherRecord> {
        self.weather_index.get(&date).map(|&i| &self.weather[i])
    }

    /// Distinct guest ids, ascending.
    pub fn guest_ids(&self) -> Vec<GuestId> {
        self.guest_index.keys().copied().collect()
    }

    pub fn has_guest(&self, guest_id: GuestId) -> bool {
        self.guest_index.contains_key(&guest_id)
    }

    /// Insert a stay and update the guest/date indices
    pub fn insert_stay(&mut self, stay: StayRecord) {
        let row = self.stays.len();
        self.guest_index.entry(stay.guest_id).or_default().push(row);
        self.stay_date_index.entry(stay.date).or_default().push(row);
        self.stays.push(stay);
    }

    /// Insert an event and update the date/id indices.
    ///
    /// A repeated id keeps pointing at the first row; `validate` reports it.
    pub fn insert_event(&mut self, event: Event) {
        let row = self.events.len();
        self.event_date_index.entry(event.date).or_default().push(row);
        self.event_id_index.entry(event.event_id).or_insert(row);
        self.events.push(event);
    }

    pub fn insert_weather(&mut self, record: WeatherRecord) {
        let row = self.weather.len();
        self.weather_index.entry(record.date).or_insert(row);
        self.weather.push(record);
    }

    /// Get counts for debugging/validation: (stays, guests, events, weather days)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.stays.len(),
            self.guest_index.len(),
            self.events.len(),
            self.weather.len(),
        )
    }
}

impl Default for TourismData {
    fn default() -> Self {
        Self::new()
    }
}
