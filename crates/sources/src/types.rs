//! Shared types for the recommendation sources.

use data_loader::{Event, EventId};
use serde::Serialize;

/// Which recommender produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CandidateSource {
    /// Neighbour-weighted popularity over the guest x event matrix
    Collaborative,
    /// TF-IDF similarity to the guest's persona events
    Content,
}

/// A ranked event produced by one of the sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub event: Event,
    pub source: CandidateSource,
    /// Source-specific score: summed neighbour weight or cosine similarity.
    /// Unranked fallback candidates carry 0.0.
    pub score: f64,
}

impl Candidate {
    pub fn new(event: Event, source: CandidateSource, score: f64) -> Self {
        Self {
            event,
            source,
            score,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event.event_id
    }

    pub fn into_event(self) -> Event {
        self.event
    }
}
