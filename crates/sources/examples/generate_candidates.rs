//! Example: Generate event candidates for a guest
//!
//! Run with: cargo run --package sources --example generate_candidates [guest_id]
//!
//! This example shows how to:
//! 1. Load the tourism snapshots
//! 2. Cluster guests into personas
//! 3. Generate collaborative candidates
//! 4. Generate content candidates
//! 5. Display the results

use data_loader::TourismData;
use sources::{Candidate, CollaborativeSource, ContentSource, PersonaClusterer};
use std::path::Path;
use std::time::Instant;

fn print_candidates(label: &str, candidates: &[Candidate]) {
    println!("\n{} candidates:", label);
    if candidates.is_empty() {
        println!("  (none)");
    }
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "  {}. {} | {} @ {} (score: {:.3})",
            i + 1,
            candidate.event.date,
            candidate.event.name,
            candidate.event.location,
            candidate.score
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Tourism Candidate Generation Example ===\n");

    let guest_id: u32 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(1);

    let start = Instant::now();
    let data = TourismData::load_from_dir(Path::new("datasets"))?;
    let (stays, guests, events, weather) = data.counts();
    println!(
        "Loaded {} stays ({} guests), {} events, {} weather days in {:?}",
        stays,
        guests,
        events,
        weather,
        start.elapsed()
    );

    let start = Instant::now();
    let personas = PersonaClusterer::new(5, 42).fit(data.stays())?;
    println!("Clustered {} guests in {:?}", personas.len(), start.elapsed());
    match personas.label_of(guest_id) {
        Some(label) => println!("Guest {} belongs to persona {}", guest_id, label),
        None => println!("Guest {} has no stays (cold start)", guest_id),
    }

    let window = data.events().to_vec();

    let start = Instant::now();
    let collaborative = CollaborativeSource::new(10).recommend(window.clone(), guest_id, data.stays(), 5);
    let collaborative_time = start.elapsed();
    print_candidates("Collaborative", &collaborative);

    let start = Instant::now();
    let content = ContentSource::new().recommend(window, guest_id, &personas, data.stays(), 5);
    let content_time = start.elapsed();
    print_candidates("Content", &content);

    println!("\n=== Timing ===");
    println!("  Collaborative: {:?}", collaborative_time);
    println!("  Content: {:?}", content_time);

    Ok(())
}
