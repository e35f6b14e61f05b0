//! Data access seam for the orchestrator.
//!
//! The orchestrator asks its `DataSource` for a fresh snapshot on every
//! request, so each call owns its tables and nothing is shared or mutated
//! across calls.

use anyhow::{Context, Result};
use data_loader::TourismData;
use std::path::PathBuf;
use std::sync::Arc;

pub trait DataSource: Send + Sync {
    /// Load a complete, independently owned snapshot.
    fn load(&self) -> Result<TourismData>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Reads the three CSV snapshots from a directory on every load.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DataSource for CsvDirectory {
    fn load(&self) -> Result<TourismData> {
        TourismData::load_from_dir(&self.dir)
            .with_context(|| format!("Failed to load datasets from {}", self.dir.display()))
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }
}

/// Serves copies of a fixed snapshot.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    data: Arc<TourismData>,
}

impl InMemorySource {
    pub fn new(data: TourismData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

impl DataSource for InMemorySource {
    fn load(&self) -> Result<TourismData> {
        Ok(self.data.as_ref().clone())
    }

    fn describe(&self) -> String {
        let (stays, guests, events, weather) = self.data.counts();
        format!(
            "memory:{} stays/{} guests/{} events/{} weather",
            stays, guests, events, weather
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use data_loader::{Event, StayRecord};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_csv_directory_loads_fresh_snapshot() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("events.csv"),
            "event_id,date,type,name,location,expected_attendance\n7,2024-06-01,concert,Jazz Night,\"Paradiso, Amsterdam\",500\n",
        )
        .unwrap();

        let source = CsvDirectory::new(dir.path());
        let data = source.load().unwrap();
        assert_eq!(data.events().len(), 1);
        assert_eq!(data.events()[0].location, "Paradiso, Amsterdam");
        assert!(data.stays().is_empty());
        assert!(source.describe().starts_with("csv:"));
    }

    #[test]
    fn test_csv_directory_reports_bad_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bookings.csv"), "guest_id,date\nabc,2024-06-01\n").unwrap();

        let err = CsvDirectory::new(dir.path()).load().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load datasets"));
    }

    #[test]
    fn test_in_memory_source_hands_out_copies() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let data = TourismData::from_records(
            vec![StayRecord::new(1, day)],
            vec![Event::new(1, day, "concert", "Jazz Night", "Paradiso", 500)],
            Vec::new(),
        );
        let source = InMemorySource::new(data);

        let mut first = source.load().unwrap();
        first.insert_stay(StayRecord::new(2, day));
        let second = source.load().unwrap();

        assert_eq!(first.stays().len(), 2);
        assert_eq!(second.stays().len(), 1);
    }
}
