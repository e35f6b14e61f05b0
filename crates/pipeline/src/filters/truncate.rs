//! Cap the list length.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Event;

/// Keeps the first `limit` events.
pub struct TruncateFilter {
    limit: usize,
}

impl TruncateFilter {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Filter for TruncateFilter {
    fn name(&self) -> &str {
        "TruncateFilter"
    }

    fn apply(&self, mut events: Vec<Event>) -> Result<Vec<Event>> {
        events.truncate(self.limit);
        Ok(events)
    }
}
