//! Drop events whose name was already seen earlier in the list.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Event;
use std::collections::HashSet;

/// Keeps the first event per exact name.
pub struct UniqueNameFilter;

impl Filter for UniqueNameFilter {
    fn name(&self) -> &str {
        "UniqueNameFilter"
    }

    fn apply(&self, events: Vec<Event>) -> Result<Vec<Event>> {
        let mut seen = HashSet::with_capacity(events.len());
        Ok(events
            .into_iter()
            .filter(|event| seen.insert(event.name.clone()))
            .collect())
    }
}
