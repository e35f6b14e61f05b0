//! Content-based filtering over TF-IDF vectors of event text.
//!
//! "Events that read like the ones your persona stayed for."
//!
//! ## Algorithm
//! 1. Shuffle the window events with a seed derived from the guest id
//! 2. Resolve the guest's persona (label 0 when unassigned)
//! 3. Persona events = window events on any stay date of the persona cohort
//! 4. Walk [`FALLBACK_POLICY`]; the first matching rule decides the result
//! 5. Otherwise fit TF-IDF on the persona event text, take the centroid of
//!    the persona rows and score every candidate by cosine similarity
//! 6. Sort ascending by score and reverse, so the best match comes first
//!    and tied candidates come out in reverse shuffled order
//!
//! Event text is `"{type} {name} {location}"`.

use crate::personas::{PersonaAssignment, PersonaId};
use crate::similarity::{cosine, mean_vector};
use crate::tfidf::{TfIdfVectorizer, tokenize};
use crate::types::{Candidate, CandidateSource};
use aprender::AprenderError;
use chrono::NaiveDate;
use data_loader::{Event, GuestId, StayRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Why the content recommender skipped TF-IDF ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The date window holds no events at all
    NoCandidates,
    /// Nobody in the guest's persona has a stay
    NoCohortStays,
    /// No window event falls on a cohort stay date
    NoPersonaEvents,
    /// Every window event is a persona event, nothing to discriminate
    PersonaCoversAllCandidates,
    /// Persona event text is blank after trimming
    BlankPersonaText,
    /// Persona event text yields no usable tokens
    EmptyVocabulary,
}

/// What to return when a fallback rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackAction {
    ReturnEmpty,
    /// First `n` shuffled window events, unranked
    FirstShuffled,
}

/// One row of the fallback policy: condition, then action.
pub struct FallbackRule {
    pub reason: FallbackReason,
    pub applies: fn(&CohortView) -> bool,
    pub action: FallbackAction,
}

/// Fallback rules, evaluated top to bottom before any TF-IDF work.
pub const FALLBACK_POLICY: &[FallbackRule] = &[
    FallbackRule {
        reason: FallbackReason::NoCandidates,
        applies: |view| view.candidates.is_empty(),
        action: FallbackAction::ReturnEmpty,
    },
    FallbackRule {
        reason: FallbackReason::NoCohortStays,
        applies: |view| view.cohort_stays == 0,
        action: FallbackAction::FirstShuffled,
    },
    FallbackRule {
        reason: FallbackReason::NoPersonaEvents,
        applies: |view| view.persona_events.is_empty(),
        action: FallbackAction::FirstShuffled,
    },
    FallbackRule {
        reason: FallbackReason::PersonaCoversAllCandidates,
        applies: |view| view.persona_events.len() == view.candidates.len(),
        action: FallbackAction::FirstShuffled,
    },
    FallbackRule {
        reason: FallbackReason::BlankPersonaText,
        applies: |view| view.persona_texts().all(|text| text.trim().is_empty()),
        action: FallbackAction::FirstShuffled,
    },
    FallbackRule {
        reason: FallbackReason::EmptyVocabulary,
        applies: |view| view.persona_texts().all(|text| tokenize(&text).is_empty()),
        action: FallbackAction::FirstShuffled,
    },
];

/// The guest's persona cohort projected onto the shuffled window.
#[derive(Debug)]
pub struct CohortView {
    pub persona: PersonaId,
    /// Window events in guest-seeded shuffled order
    pub candidates: Vec<Event>,
    /// Stay rows belonging to the persona's guests
    pub cohort_stays: usize,
    /// Indices into `candidates` of events on cohort stay dates
    pub persona_events: Vec<usize>,
}

impl CohortView {
    pub fn build(
        events: Vec<Event>,
        guest_id: GuestId,
        personas: &PersonaAssignment,
        stays: &[StayRecord],
    ) -> Self {
        let candidates = shuffle_for_guest(events, guest_id);
        let persona = personas.label_of(guest_id).unwrap_or(0);
        let cohort: HashSet<GuestId> = personas.members(persona).into_iter().collect();

        let mut cohort_stays = 0;
        let mut cohort_dates: HashSet<NaiveDate> = HashSet::new();
        for stay in stays.iter().filter(|stay| cohort.contains(&stay.guest_id)) {
            cohort_stays += 1;
            cohort_dates.insert(stay.date);
        }

        let persona_events = candidates
            .iter()
            .enumerate()
            .filter(|(_, event)| cohort_dates.contains(&event.date))
            .map(|(idx, _)| idx)
            .collect();

        Self {
            persona,
            candidates,
            cohort_stays,
            persona_events,
        }
    }

    pub fn persona_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.persona_events.iter().map(|&idx| self.candidates[idx].text())
    }

    /// First fallback rule that applies, if any.
    pub fn fallback(&self) -> Option<&'static FallbackRule> {
        FALLBACK_POLICY.iter().find(|rule| (rule.applies)(self))
    }
}

/// Shuffle `events` with a generator seeded from the guest id.
pub fn shuffle_for_guest(mut events: Vec<Event>, guest_id: GuestId) -> Vec<Event> {
    let mut rng = StdRng::seed_from_u64(u64::from(guest_id));
    events.shuffle(&mut rng);
    events
}

/// Content-based recommender.
#[derive(Debug, Clone, Default)]
pub struct ContentSource;

impl ContentSource {
    pub fn new() -> Self {
        Self
    }

    /// Rank window events for `guest_id` by similarity to its persona.
    #[instrument(skip(self, events, personas, stays), fields(window = events.len()))]
    pub fn recommend(
        &self,
        events: Vec<Event>,
        guest_id: GuestId,
        personas: &PersonaAssignment,
        stays: &[StayRecord],
        n: usize,
    ) -> Vec<Candidate> {
        let view = CohortView::build(events, guest_id, personas, stays);
        debug!(
            "Persona {} cohort: {} stays, {} of {} window events",
            view.persona,
            view.cohort_stays,
            view.persona_events.len(),
            view.candidates.len()
        );

        if let Some(rule) = view.fallback() {
            debug!("Content fallback: {:?} -> {:?}", rule.reason, rule.action);
            return match rule.action {
                FallbackAction::ReturnEmpty => Vec::new(),
                FallbackAction::FirstShuffled => first_shuffled(view.candidates, n),
            };
        }

        let similarities = match persona_similarities(&view) {
            Ok(similarities) => similarities,
            Err(err) => {
                warn!("TF-IDF ranking failed, using shuffled order: {}", err);
                return first_shuffled(view.candidates, n);
            }
        };

        let mut scored: Vec<(f64, Event)> = similarities.into_iter().zip(view.candidates).collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.reverse();

        let candidates: Vec<Candidate> = scored
            .into_iter()
            .take(n)
            .map(|(similarity, event)| Candidate::new(event, CandidateSource::Content, similarity))
            .collect();
        debug!("Generated {} content candidates", candidates.len());
        candidates
    }
}

/// Cosine similarity of every candidate to the persona-event centroid, in
/// candidate order.
fn persona_similarities(view: &CohortView) -> Result<Vec<f64>, AprenderError> {
    let persona_texts: Vec<String> = view.persona_texts().collect();
    let vectorizer = TfIdfVectorizer::fit(&persona_texts)?;
    let centroid = mean_vector(&vectorizer.transform(&persona_texts)?);

    let candidate_texts: Vec<String> = view.candidates.iter().map(Event::text).collect();
    Ok(vectorizer
        .transform(&candidate_texts)?
        .iter()
        .map(|row| cosine(&centroid, row))
        .collect())
}

fn first_shuffled(candidates: Vec<Event>, n: usize) -> Vec<Candidate> {
    candidates
        .into_iter()
        .take(n)
        .map(|event| Candidate::new(event, CandidateSource::Content, 0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personas::PersonaClusterer;
    use data_loader::EventId;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn event(id: EventId, d: u32, kind: &str, name: &str, location: &str) -> Event {
        Event::new(id, date(d), kind, name, location, 500)
    }

    fn ids(candidates: &[Candidate]) -> Vec<EventId> {
        candidates.iter().map(Candidate::event_id).collect()
    }

    fn window() -> Vec<Event> {
        vec![
            event(1, 1, "concert", "Jazz Night", "Paradiso"),
            event(2, 2, "concert", "Jazz Brunch", "Bimhuis"),
            event(3, 3, "sports", "Marathon", "Vondelpark"),
            event(4, 4, "festival", "Food Truck Festival", "NDSM"),
            event(5, 5, "concert", "Late Jazz Session", "Paradiso"),
        ]
    }

    #[test]
    fn test_shuffle_is_deterministic_per_guest() {
        let a = shuffle_for_guest(window(), 7);
        let b = shuffle_for_guest(window(), 7);
        assert_eq!(a, b);

        let mut sorted: Vec<EventId> = a.iter().map(|e| e.event_id).collect();
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_window_returns_empty() {
        let personas = PersonaAssignment::default();
        let recs = ContentSource::new().recommend(Vec::new(), 1, &personas, &[], 5);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_cold_start_falls_back_to_shuffled_head() {
        let personas = PersonaAssignment::default();
        let recs = ContentSource::new().recommend(window(), 1, &personas, &[], 3);

        let expected: Vec<EventId> = shuffle_for_guest(window(), 1)
            .iter()
            .take(3)
            .map(|e| e.event_id)
            .collect();
        assert_eq!(ids(&recs), expected);
        assert!(recs.iter().all(|c| c.score == 0.0));
    }

    #[test]
    fn test_no_persona_events_falls_back() {
        let stays = vec![StayRecord::new(1, date(20))];
        let personas = PersonaClusterer::new(1, 42).fit(&stays).unwrap();
        let view = CohortView::build(window(), 1, &personas, &stays);
        assert_eq!(view.fallback().map(|r| r.reason), Some(FallbackReason::NoPersonaEvents));
    }

    #[test]
    fn test_persona_covering_all_candidates_falls_back() {
        let stays: Vec<StayRecord> = (1..=5).map(|d| StayRecord::new(1, date(d))).collect();
        let personas = PersonaClusterer::new(1, 42).fit(&stays).unwrap();
        let view = CohortView::build(window(), 1, &personas, &stays);
        assert_eq!(
            view.fallback().map(|r| r.reason),
            Some(FallbackReason::PersonaCoversAllCandidates)
        );
    }

    #[test]
    fn test_blank_and_tokenless_persona_text_fall_back() {
        let mut events = window();
        events.push(Event::new(6, date(6), "", "", "", 0));
        let stays = vec![StayRecord::new(1, date(6))];
        let personas = PersonaClusterer::new(1, 42).fit(&stays).unwrap();
        let view = CohortView::build(events, 1, &personas, &stays);
        assert_eq!(view.fallback().map(|r| r.reason), Some(FallbackReason::BlankPersonaText));

        let mut events = window();
        events.push(Event::new(6, date(6), "x", "&", "-", 0));
        let view = CohortView::build(events, 1, &personas, &stays);
        assert_eq!(view.fallback().map(|r| r.reason), Some(FallbackReason::EmptyVocabulary));
    }

    #[test]
    fn test_ranks_by_similarity_to_persona_events() {
        // Persona stayed on the Jazz Night date only
        let stays = vec![StayRecord::new(1, date(1))];
        let personas = PersonaClusterer::new(1, 42).fit(&stays).unwrap();

        let recs = ContentSource::new().recommend(window(), 1, &personas, &stays, 5);
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0].event_id(), 1);
        assert!((recs[0].score - 1.0).abs() < 1e-9);
        // The other Paradiso jazz concert beats the unrelated events
        assert_eq!(recs[1].event_id(), 5);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(recs.iter().all(|c| c.source == CandidateSource::Content));
    }

    #[test]
    fn test_similarity_ties_rank_in_reverse_shuffled_order() {
        let events = vec![
            event(1, 1, "concert", "Jazz Night", "Paradiso"),
            event(2, 2, "sports", "Marathon", "Vondelpark"),
            event(3, 3, "market", "Flower Market", "Singel"),
            event(4, 4, "festival", "Food Trucks", "NDSM"),
            event(5, 5, "exhibition", "Rembrandt", "Rijksmuseum"),
        ];
        let stays = vec![StayRecord::new(1, date(1))];
        let personas = PersonaClusterer::new(1, 42).fit(&stays).unwrap();

        // Events 2-5 share no token with the persona event and all score 0
        let tied: Vec<EventId> = shuffle_for_guest(events.clone(), 1)
            .iter()
            .map(|e| e.event_id)
            .filter(|&id| id != 1)
            .collect();

        let recs = ContentSource::new().recommend(events.clone(), 1, &personas, &stays, 5);
        let mut expected = vec![1];
        expected.extend(tied.iter().rev());
        assert_eq!(ids(&recs), expected);

        // Truncation cuts through the tie from the end of the shuffle
        let recs = ContentSource::new().recommend(events, 1, &personas, &stays, 2);
        assert_eq!(ids(&recs), vec![1, *tied.last().unwrap()]);
    }

    #[test]
    fn test_single_event_window_without_stays_returns_it() {
        let events = vec![event(7, 1, "concert", "Jazz Night", "Paradiso, Amsterdam")];
        let stays = vec![StayRecord::new(2, date(10))];
        let personas = PersonaClusterer::new(5, 42).fit(&stays).unwrap();

        let recs = ContentSource::new().recommend(events, 1, &personas, &stays, 5);
        assert_eq!(ids(&recs), vec![7]);
    }
}
