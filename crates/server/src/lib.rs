//! Server crate for the tourism event recommender.
//!
//! This crate contains the orchestrator that blends the recommendation
//! sources, plus its configuration and data-access seam.

pub mod config;
pub mod data_source;
pub mod orchestrator;

pub use config::{ConfigError, RecommenderConfig};
pub use data_source::{CsvDirectory, DataSource, InMemorySource};
pub use orchestrator::{DayPlan, GuestSummary, ItineraryEvent, RecommendationOrchestrator};
