//! The FilterPipeline orchestrates multiple filters.
//!
//! Filters run in insertion order, each receiving the previous output.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Event;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(UniqueNameFilter)
///     .add_filter(TruncateFilter::new(n))
///     .add_filter(DateOrderFilter);
///
/// let result = pipeline.apply(merged)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence.
    ///
    /// Stops at the first filter that fails.
    pub fn apply(&self, events: Vec<Event>) -> Result<Vec<Event>> {
        let mut current = events;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{DateOrderFilter, TruncateFilter, UniqueNameFilter};
    use chrono::NaiveDate;

    fn event(id: u32, day: u32, name: &str) -> Event {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        Event::new(id, date, "concert", name, "Paradiso", 100)
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        assert!(pipeline.is_empty());

        let events = vec![event(1, 2, "A"), event(2, 1, "B")];
        let filtered = pipeline.apply(events.clone()).unwrap();
        assert_eq!(filtered, events);
    }

    #[test]
    fn test_filters_run_in_order() {
        let pipeline = FilterPipeline::new()
            .add_filter(UniqueNameFilter)
            .add_filter(TruncateFilter::new(2))
            .add_filter(DateOrderFilter);
        assert_eq!(pipeline.len(), 3);

        let events = vec![
            event(1, 5, "Jazz Night"),
            event(2, 3, "Jazz Night"),
            event(3, 1, "Rock Concert"),
            event(4, 2, "Pop Show"),
        ];
        let ids: Vec<u32> = pipeline
            .apply(events)
            .unwrap()
            .iter()
            .map(|e| e.event_id)
            .collect();

        // Dedupe keeps 1, 3, 4; truncation keeps 1, 3; then date order
        assert_eq!(ids, vec![3, 1]);
    }
}
