//! Collaborative filtering over a guest x event interaction matrix.
//!
//! "Guests who stayed on the same event days as you also stayed for these."
//!
//! ## Algorithm
//! 1. Find the dates the target guest stayed; keep the window events on them
//! 2. Build the interaction matrix: cell (g, e) = number of stay rows of
//!    guest g on the date of event e
//! 3. Cosine similarity between the target row and every row
//! 4. Take the `similar_users_count - 1` most similar *other* guests
//! 5. Sum their rows, drop events the target was already exposed to
//! 6. Return the top `n` events by summed weight
//!
//! Every "not enough signal" case returns an empty list, never an error.

use crate::similarity::cosine;
use crate::types::{Candidate, CandidateSource};
use aprender::primitives::Vector;
use chrono::NaiveDate;
use data_loader::{Event, EventId, GuestId, StayRecord};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, instrument};

/// Dense guest x event count matrix.
///
/// Rows are guests with at least one stay on a window event's date
/// (ascending id); columns are the events on those dates (ascending id).
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    guests: Vec<GuestId>,
    event_ids: Vec<EventId>,
    rows: Vec<Vector<f64>>,
}

impl InteractionMatrix {
    /// Cross stay dates with event dates.
    pub fn build(events: &[Event], stays: &[StayRecord]) -> Self {
        let mut events_by_date: HashMap<NaiveDate, BTreeSet<EventId>> = HashMap::new();
        for event in events {
            events_by_date.entry(event.date).or_default().insert(event.event_id);
        }

        // stays per (guest, date), restricted to dates that have events
        let mut stay_counts: BTreeMap<(GuestId, NaiveDate), u32> = BTreeMap::new();
        for stay in stays {
            if events_by_date.contains_key(&stay.date) {
                *stay_counts.entry((stay.guest_id, stay.date)).or_insert(0) += 1;
            }
        }

        let mut guests: Vec<GuestId> = stay_counts.keys().map(|&(g, _)| g).collect();
        guests.dedup();
        let event_ids: Vec<EventId> = stay_counts
            .keys()
            .flat_map(|(_, date)| events_by_date[date].iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let column: HashMap<EventId, usize> =
            event_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut rows = vec![vec![0.0; event_ids.len()]; guests.len()];
        let mut row_idx = 0;
        for (&(guest_id, date), &count) in &stay_counts {
            while guests[row_idx] != guest_id {
                row_idx += 1;
            }
            for event_id in &events_by_date[&date] {
                rows[row_idx][column[event_id]] += f64::from(count);
            }
        }

        Self {
            guests,
            event_ids,
            rows: rows.into_iter().map(Vector::from_vec).collect(),
        }
    }

    pub fn row_of(&self, guest_id: GuestId) -> Option<usize> {
        self.guests.binary_search(&guest_id).ok()
    }

    pub fn guests(&self) -> &[GuestId] {
        &self.guests
    }

    pub fn event_ids(&self) -> &[EventId] {
        &self.event_ids
    }

    pub fn row(&self, idx: usize) -> &Vector<f64> {
        &self.rows[idx]
    }

    #[cfg(test)]
    fn get(&self, guest_id: GuestId, event_id: EventId) -> f64 {
        match (self.row_of(guest_id), self.event_ids.binary_search(&event_id)) {
            (Some(r), Ok(c)) => self.rows[r].as_slice()[c],
            _ => 0.0,
        }
    }
}

/// Collaborative-filtering recommender.
#[derive(Debug, Clone)]
pub struct CollaborativeSource {
    /// Size of the neighbour pool including the target guest
    similar_users_count: usize,
}

impl CollaborativeSource {
    pub fn new(similar_users_count: usize) -> Self {
        Self {
            similar_users_count,
        }
    }

    /// Rank window events for `guest_id`.
    ///
    /// `events` is the caller's already date-filtered window, taken by value
    /// so this path never shares a table with the content recommender.
    #[instrument(skip(self, events, stays), fields(window = events.len()))]
    pub fn recommend(
        &self,
        events: Vec<Event>,
        guest_id: GuestId,
        stays: &[StayRecord],
        n: usize,
    ) -> Vec<Candidate> {
        // Step 1: the guest's exposure inside the window
        let guest_dates: HashSet<NaiveDate> = stays
            .iter()
            .filter(|stay| stay.guest_id == guest_id)
            .map(|stay| stay.date)
            .collect();
        if guest_dates.is_empty() {
            debug!("Guest {} has no stays, no collaborative signal", guest_id);
            return Vec::new();
        }
        let exposed: HashSet<EventId> = events
            .iter()
            .filter(|event| guest_dates.contains(&event.date))
            .map(|event| event.event_id)
            .collect();
        if exposed.is_empty() {
            debug!("No window events on guest {}'s stay dates", guest_id);
            return Vec::new();
        }

        // Step 2: interaction matrix
        let matrix = InteractionMatrix::build(&events, stays);
        let Some(target) = matrix.row_of(guest_id) else {
            return Vec::new();
        };

        // Step 3 + 4: neighbours
        let neighbours = self.similar_guests(&matrix, target);
        debug!("Found {} similar guests", neighbours.len());

        // Step 5: neighbour-weighted popularity
        let mut weights = vec![0.0; matrix.event_ids().len()];
        for &row in &neighbours {
            for (w, v) in weights.iter_mut().zip(matrix.row(row).as_slice()) {
                *w += v;
            }
        }

        let mut ranked: Vec<(EventId, f64)> = matrix
            .event_ids()
            .iter()
            .copied()
            .zip(weights)
            .filter(|(event_id, _)| !exposed.contains(event_id))
            .collect();
        // Stable sort keeps ascending event id among equal weights
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);

        // Step 6: back to full event records
        let mut by_id: HashMap<EventId, Event> = HashMap::with_capacity(events.len());
        for event in events {
            by_id.entry(event.event_id).or_insert(event);
        }
        let candidates: Vec<Candidate> = ranked
            .into_iter()
            .filter_map(|(event_id, weight)| {
                by_id
                    .remove(&event_id)
                    .map(|event| Candidate::new(event, CandidateSource::Collaborative, weight))
            })
            .collect();

        debug!("Generated {} collaborative candidates", candidates.len());
        candidates
    }

    /// Row indices of the most similar other guests.
    ///
    /// The target always heads the similarity ranking (its self-similarity
    /// is maximal) and is dropped, leaving `similar_users_count - 1` rows.
    /// Other rows are ordered by descending similarity, then ascending id.
    fn similar_guests(&self, matrix: &InteractionMatrix, target: usize) -> Vec<usize> {
        let target_row = matrix.row(target);
        let similarities: Vec<f64> = (0..matrix.guests().len())
            .into_par_iter()
            .map(|idx| cosine(target_row, matrix.row(idx)))
            .collect();

        let mut others: Vec<usize> = (0..similarities.len()).filter(|&idx| idx != target).collect();
        others.sort_by(|&a, &b| similarities[b].total_cmp(&similarities[a]));

        let mut pool = Vec::with_capacity(self.similar_users_count);
        pool.push(target);
        pool.extend(others);
        pool.truncate(self.similar_users_count);
        pool.into_iter().skip(1).collect()
    }
}
