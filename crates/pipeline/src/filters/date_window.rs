//! Restrict events to a calendar-date window.

use crate::traits::Filter;
use anyhow::Result;
use chrono::{Days, NaiveDate};
use data_loader::Event;
use serde::Serialize;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Fill in a partially specified window.
    ///
    /// A missing start becomes the day after `today`; a missing end becomes
    /// `start + default_days`.
    pub fn resolve(
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        default_days: u32,
    ) -> Self {
        let start = start.unwrap_or_else(|| add_days(today, 1));
        let end = end.unwrap_or_else(|| add_days(start, default_days));
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Keeps events whose date lies inside the window (both ends inclusive).
pub struct DateWindowFilter {
    window: DateWindow,
}

impl DateWindowFilter {
    pub fn new(window: DateWindow) -> Self {
        Self { window }
    }
}

impl Filter for DateWindowFilter {
    fn name(&self) -> &str {
        "DateWindowFilter"
    }

    fn apply(&self, events: Vec<Event>) -> Result<Vec<Event>> {
        Ok(events
            .into_iter()
            .filter(|event| self.window.contains(event.date))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let today = date(6, 1);

        let window = DateWindow::resolve(today, None, None, 30);
        assert_eq!(window, DateWindow::new(date(6, 2), date(7, 2)));

        let window = DateWindow::resolve(today, Some(date(8, 1)), None, 30);
        assert_eq!(window, DateWindow::new(date(8, 1), date(8, 31)));

        let window = DateWindow::resolve(today, None, Some(date(6, 10)), 30);
        assert_eq!(window, DateWindow::new(date(6, 2), date(6, 10)));
    }

    #[test]
    fn test_filter_is_inclusive() {
        let events: Vec<Event> = (1..=5)
            .map(|d| Event::new(d, date(6, d), "concert", format!("Show {d}"), "Melkweg", 10))
            .collect();
        let filter = DateWindowFilter::new(DateWindow::new(date(6, 2), date(6, 4)));

        let kept: Vec<u32> = filter.apply(events).unwrap().iter().map(|e| e.event_id).collect();
        assert_eq!(kept, vec![2, 3, 4]);
    }

    #[test]
    fn test_inverted_window_keeps_nothing() {
        let events = vec![Event::new(1, date(6, 3), "concert", "Show", "Melkweg", 10)];
        let filter = DateWindowFilter::new(DateWindow::new(date(6, 4), date(6, 2)));
        assert!(filter.apply(events).unwrap().is_empty());
    }
}
