//! Benchmarks for candidate generation
//!
//! Run with: cargo bench --package sources
//!
//! Uses a synthetic city of 2000 guests and 90 days of events so the
//! benchmark does not depend on generated datasets being present.

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Event, StayRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sources::{CollaborativeSource, ContentSource, PersonaClusterer};

const KINDS: [&str; 4] = ["concert", "festival", "sports", "exhibition"];
const VENUES: [&str; 5] = ["Paradiso", "Melkweg", "Ziggo Dome", "Vondelpark", "NDSM"];

fn synthetic_city() -> (Vec<Event>, Vec<StayRecord>) {
    let mut rng = StdRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let events: Vec<Event> = (0..180)
        .map(|id| {
            let date = start + Days::new(rng.random_range(0..90));
            let kind = KINDS[rng.random_range(0..KINDS.len())];
            let venue = VENUES[rng.random_range(0..VENUES.len())];
            Event::new(id, date, kind, format!("{kind} night {id}"), venue, rng.random_range(100..20_000))
        })
        .collect();

    let stays: Vec<StayRecord> = (0..8_000)
        .map(|_| {
            let mut stay = StayRecord::new(rng.random_range(1..=2_000), start + Days::new(rng.random_range(0..90)));
            stay.age = Some(rng.random_range(18.0..80.0));
            stay.average_daily_rate = Some(rng.random_range(5_000.0..30_000.0));
            stay.rooms_booked = Some(rng.random_range(1..4));
            stay
        })
        .collect();

    (events, stays)
}

fn bench_personas(c: &mut Criterion) {
    let (_, stays) = synthetic_city();
    let clusterer = PersonaClusterer::new(5, 42);

    c.bench_function("persona_clustering", |b| {
        b.iter(|| black_box(clusterer.fit(black_box(&stays))))
    });
}

fn bench_collaborative(c: &mut Criterion) {
    let (events, stays) = synthetic_city();
    let source = CollaborativeSource::new(10);

    c.bench_function("collaborative_recommend", |b| {
        b.iter(|| black_box(source.recommend(events.clone(), black_box(42), &stays, 5)))
    });
}

fn bench_content(c: &mut Criterion) {
    let (events, stays) = synthetic_city();
    let personas = PersonaClusterer::new(5, 42)
        .fit(&stays)
        .expect("synthetic stays cluster");
    let source = ContentSource::new();

    c.bench_function("content_recommend", |b| {
        b.iter(|| black_box(source.recommend(events.clone(), black_box(42), &personas, &stays, 5)))
    });
}

criterion_group!(benches, bench_personas, bench_collaborative, bench_content);
criterion_main!(benches);
