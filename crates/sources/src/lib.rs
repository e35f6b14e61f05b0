//! # Sources Crate
//!
//! Candidate generation for event recommendations.
//!
//! ## Components
//!
//! ### Persona Clusterer
//! Groups guests into K behavioural personas from aggregated stay statistics
//! (age, mean nightly rate, total rooms) with aprender's `StandardScaler`
//! and seeded `KMeans`.
//!
//! ### Collaborative Source
//! "Guests who stayed on the same event days as you also stayed for..."
//! - Guest x event interaction matrix from stay-date / event-date overlap
//! - Cosine-similar neighbours, summed interaction weights
//!
//! ### Content Source
//! "Events that read like the ones your persona stayed for"
//! - TF-IDF over event type, name and location (aprender `CountVectorizer`)
//! - Ranked by cosine similarity to the persona-event centroid
//! - Ordered fallback policy for cold-start guests
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::TourismData;
//! use sources::{CollaborativeSource, ContentSource, PersonaClusterer};
//!
//! let data = TourismData::load_from_dir(Path::new("datasets"))?;
//! let personas = PersonaClusterer::new(5, 42).fit(data.stays())?;
//!
//! let window: Vec<_> = data.events().to_vec();
//! let collaborative = CollaborativeSource::new(10).recommend(window.clone(), 42, data.stays(), 5);
//! let content = ContentSource::new().recommend(window, 42, &personas, data.stays(), 5);
//! ```
//!
//! Every call recomputes from its inputs; nothing is cached between calls.

pub mod clustering;
pub mod collaborative;
pub mod content;
pub mod personas;
pub mod similarity;
pub mod tfidf;
pub mod types;

pub use clustering::ClusteringError;
pub use collaborative::{CollaborativeSource, InteractionMatrix};
pub use content::{ContentSource, FallbackAction, FallbackReason, FALLBACK_POLICY};
pub use personas::{GuestProfile, PersonaAssignment, PersonaClusterer, PersonaId, PersonaSummary};
pub use types::{Candidate, CandidateSource};
