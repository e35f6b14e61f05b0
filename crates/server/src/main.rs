//! Simple test harness for the recommendation orchestrator.
//!
//! Requests recommendations and an itinerary for one guest.
//!
//! Usage: server [guest_id] [datasets_dir]

use anyhow::{Context, Result};
use tracing::info;

use server::{RecommendationOrchestrator, RecommenderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,sources=debug,pipeline=debug")
        .init();

    info!("Starting tourism recommender test harness");

    let mut args = std::env::args().skip(1);
    let guest_id: u32 = match args.next() {
        Some(raw) => raw.parse().context("guest_id must be a non-negative integer")?,
        None => 1,
    };
    let mut config = RecommenderConfig::default();
    if let Some(dir) = args.next() {
        config = config.with_datasets_path(dir);
    }

    let orchestrator = RecommendationOrchestrator::from_config(config)?;
    let n = orchestrator.config().default_recommendations;
    let days = orchestrator.config().default_itinerary_days;
    let per_day = orchestrator.config().default_events_per_day;

    // The core is synchronous; keep it off the async workers
    let (recommendations, itinerary) = tokio::task::spawn_blocking(move || -> Result<_> {
        let recommendations = orchestrator.recommend_events(guest_id, n, None, None)?;
        let itinerary = orchestrator.build_itinerary(guest_id, days, per_day, None, None)?;
        Ok((recommendations, itinerary))
    })
    .await
    .context("Recommendation task panicked")??;

    info!("Received {} recommendations:", recommendations.len());
    for (i, event) in recommendations.iter().enumerate() {
        info!(
            "{}. {} {} [{}] @ {} (attendance {})",
            i + 1,
            event.date,
            event.name,
            event.event_type,
            event.location,
            event.expected_attendance
        );
    }

    info!("Itinerary over {} day(s):", itinerary.len());
    for plan in &itinerary {
        let names: Vec<&str> = plan.events.iter().map(|e| e.name.as_str()).collect();
        info!("Day {} ({}): {}", plan.day, plan.date, names.join(", "));
    }

    Ok(())
}
