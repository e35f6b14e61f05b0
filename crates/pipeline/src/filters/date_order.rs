//! Order events by date.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Event;

/// Stable ascending sort by calendar date; same-day events keep their
/// incoming order.
pub struct DateOrderFilter;

impl Filter for DateOrderFilter {
    fn name(&self) -> &str {
        "DateOrderFilter"
    }

    fn apply(&self, mut events: Vec<Event>) -> Result<Vec<Event>> {
        events.sort_by_key(|event| event.date);
        Ok(events)
    }
}
