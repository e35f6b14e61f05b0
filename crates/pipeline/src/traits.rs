//! Core traits for the event filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to event lists.

use anyhow::Result;
use data_loader::Event;

/// Core trait for filtering event lists.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across request threads
/// - Filters take ownership of the `Vec<Event>` and return the filtered list,
///   so every caller works on its own copy of the table
/// - Filters must preserve the relative order of the events they keep
///   unless reordering is their purpose
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a list of events.
    fn apply(&self, events: Vec<Event>) -> Result<Vec<Event>>;
}
