//! Parsers for the tourism CSV snapshots.
//!
//! Each file has a header row; columns are matched by name so extra columns
//! written by the dataset generators are simply ignored.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

pub const STAYS_FILE: &str = "bookings.csv";
pub const EVENTS_FILE: &str = "events.csv";
pub const WEATHER_FILE: &str = "weather.csv";

/// Deserialize every row of a headed CSV file into `T`.
///
/// Row errors carry the 1-based line number from the CSV reader so a broken
/// snapshot points straight at the offending row.
fn parse_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => {
                let line = err.position().map(|pos| pos.line());
                let reason = match err.kind() {
                    csv::ErrorKind::Deserialize { err: de, .. } => Some(de.to_string()),
                    _ => None,
                };
                return Err(match (line, reason) {
                    (Some(line), Some(reason)) => DataLoadError::ParseError {
                        file: file_name,
                        line,
                        reason,
                    },
                    _ => DataLoadError::CsvError {
                        file: file_name,
                        source: err,
                    },
                });
            }
        }
    }
    Ok(rows)
}

/// Parse `bookings.csv` into stay records.
pub fn parse_stays(path: &Path) -> Result<Vec<StayRecord>> {
    parse_csv(path)
}

/// Parse `events.csv` into event records.
pub fn parse_events(path: &Path) -> Result<Vec<Event>> {
    parse_csv(path)
}

/// Parse `weather.csv` into daily weather records.
pub fn parse_weather(path: &Path) -> Result<Vec<WeatherRecord>> {
    parse_csv(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_events_with_blank_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            EVENTS_FILE,
            "event_id,date,type,name,location,expected_attendance\n\
             7,2024-06-01,concert,Jazz Night,\"Paradiso, Amsterdam\",500\n\
             8,2024-06-02,comedy,Open Mic Night,,120\n",
        );

        let events = parse_events(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, 7);
        assert_eq!(events[0].location, "Paradiso, Amsterdam");
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(events[1].location, "");
        assert_eq!(events[1].text(), "comedy Open Mic Night ");
    }

    #[test]
    fn test_parse_stays_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            STAYS_FILE,
            "id,guest_id,first_name,date,rooms_booked,average_daily_rate,age,country_id\n\
             1,42,Mary,2024-06-01,2,12000,34,3\n\
             2,42,Mary,2024-06-02,,9000,,3\n",
        );

        let stays = parse_stays(&path).unwrap();
        assert_eq!(stays.len(), 2);
        assert_eq!(stays[0].guest_id, 42);
        assert_eq!(stays[0].rooms_booked, Some(2));
        assert_eq!(stays[0].average_daily_rate, Some(12000.0));
        assert_eq!(stays[1].rooms_booked, None);
        assert_eq!(stays[1].age, None);
        assert_eq!(stays[1].accommodation_units, None);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            WEATHER_FILE,
            "date,temperature_max,precipitation\n\
             2024-06-01,21,0.0\n\
             not-a-date,19,1.2\n",
        );

        match parse_weather(&path) {
            Err(DataLoadError::ParseError { file, line, .. }) => {
                assert_eq!(file, WEATHER_FILE);
                assert_eq!(line, 3);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
