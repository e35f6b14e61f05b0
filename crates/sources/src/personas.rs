//! Persona clustering of guests.
//!
//! Guests are summarised from their stay rows (age, mean nightly rate,
//! total rooms booked), standardised against the current guest population
//! and partitioned with seeded k-means. Assignments are recomputed from
//! scratch on every call; nothing here is cached.

use crate::clustering::{ClusteringError, StandardizedKMeans};
use data_loader::{GuestId, StayRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Persona cluster label, in `[0, K)`
pub type PersonaId = usize;

/// Aggregated per-guest statistics used as clustering features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestProfile {
    pub guest_id: GuestId,
    /// First non-missing age observed for the guest
    pub age: Option<f64>,
    /// Mean of the non-missing nightly rates
    pub avg_daily_rate: Option<f64>,
    /// Sum of rooms booked over all stays (missing counts as 0)
    pub total_rooms: u32,
    /// First non-missing country observed for the guest
    pub country_id: Option<u32>,
}

impl GuestProfile {
    /// Feature vector with missing values filled with 0.
    pub fn features(&self) -> Vec<f64> {
        vec![
            self.age.unwrap_or(0.0),
            self.avg_daily_rate.unwrap_or(0.0),
            f64::from(self.total_rooms),
        ]
    }
}

/// Build one profile per distinct guest, ordered by guest id.
pub fn aggregate_guests(stays: &[StayRecord]) -> Vec<GuestProfile> {
    struct Acc {
        age: Option<f64>,
        rate_sum: f64,
        rate_count: u32,
        rooms: u32,
        country_id: Option<u32>,
    }

    let mut per_guest: BTreeMap<GuestId, Acc> = BTreeMap::new();
    for stay in stays {
        let acc = per_guest.entry(stay.guest_id).or_insert(Acc {
            age: None,
            rate_sum: 0.0,
            rate_count: 0,
            rooms: 0,
            country_id: None,
        });
        if acc.age.is_none() {
            acc.age = stay.age;
        }
        if let Some(rate) = stay.average_daily_rate {
            acc.rate_sum += rate;
            acc.rate_count += 1;
        }
        acc.rooms += stay.rooms();
        if acc.country_id.is_none() {
            acc.country_id = stay.country_id;
        }
    }

    per_guest
        .into_iter()
        .map(|(guest_id, acc)| GuestProfile {
            guest_id,
            age: acc.age,
            avg_daily_rate: (acc.rate_count > 0).then(|| acc.rate_sum / f64::from(acc.rate_count)),
            total_rooms: acc.rooms,
            country_id: acc.country_id,
        })
        .collect()
}

/// Mean raw features of one persona, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaSummary {
    pub persona_id: PersonaId,
    pub members: usize,
    pub mean_age: f64,
    pub mean_daily_rate: f64,
    pub mean_total_rooms: f64,
}

/// Mapping from every guest in the input to exactly one persona.
#[derive(Debug, Clone, Default)]
pub struct PersonaAssignment {
    labels: BTreeMap<GuestId, PersonaId>,
    profiles: Vec<GuestProfile>,
    n_clusters: usize,
}

impl PersonaAssignment {
    pub fn label_of(&self, guest_id: GuestId) -> Option<PersonaId> {
        self.labels.get(&guest_id).copied()
    }

    /// Guests carrying `persona`, ascending by id.
    pub fn members(&self, persona: PersonaId) -> Vec<GuestId> {
        self.labels
            .iter()
            .filter(|&(_, &label)| label == persona)
            .map(|(&guest_id, _)| guest_id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GuestId, PersonaId)> + '_ {
        self.labels.iter().map(|(&g, &p)| (g, p))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Configured cluster count K (labels may use fewer when guests < K).
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn profile(&self, guest_id: GuestId) -> Option<&GuestProfile> {
        self.profiles
            .binary_search_by_key(&guest_id, |p| p.guest_id)
            .ok()
            .map(|idx| &self.profiles[idx])
    }

    pub fn profiles(&self) -> &[GuestProfile] {
        &self.profiles
    }

    /// Per-persona member counts and mean raw features, skipping empty labels.
    pub fn summaries(&self) -> Vec<PersonaSummary> {
        let mut sums: BTreeMap<PersonaId, (usize, [f64; 3])> = BTreeMap::new();
        for profile in &self.profiles {
            let Some(label) = self.label_of(profile.guest_id) else {
                continue;
            };
            let entry = sums.entry(label).or_insert((0, [0.0; 3]));
            entry.0 += 1;
            for (acc, v) in entry.1.iter_mut().zip(profile.features()) {
                *acc += v;
            }
        }

        sums.into_iter()
            .map(|(persona_id, (members, totals))| {
                let n = members as f64;
                PersonaSummary {
                    persona_id,
                    members,
                    mean_age: totals[0] / n,
                    mean_daily_rate: totals[1] / n,
                    mean_total_rooms: totals[2] / n,
                }
            })
            .collect()
    }
}

/// Groups guests into a fixed number of behavioural personas.
#[derive(Debug, Clone)]
pub struct PersonaClusterer {
    n_clusters: usize,
    random_state: u64,
}

impl PersonaClusterer {
    pub fn new(n_clusters: usize, random_state: u64) -> Self {
        Self {
            n_clusters,
            random_state,
        }
    }

    /// Assign every guest appearing in `stays` to a persona.
    #[instrument(skip(self, stays), fields(stays = stays.len(), k = self.n_clusters))]
    pub fn fit(&self, stays: &[StayRecord]) -> Result<PersonaAssignment, ClusteringError> {
        let profiles = aggregate_guests(stays);
        let features: Vec<Vec<f64>> = profiles.iter().map(GuestProfile::features).collect();

        let fit = StandardizedKMeans::new(self.n_clusters, self.random_state).fit(&features)?;
        debug!(
            "Clustered {} guests into {} personas (inertia {:.3}, {} iterations)",
            profiles.len(),
            fit.n_clusters,
            fit.inertia,
            fit.n_iter
        );

        let labels = profiles
            .iter()
            .zip(fit.labels)
            .map(|(profile, label)| (profile.guest_id, label))
            .collect();

        Ok(PersonaAssignment {
            labels,
            profiles,
            n_clusters: self.n_clusters,
        })
    }
}
