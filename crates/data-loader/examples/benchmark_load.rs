use data_loader::TourismData;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("datasets");

    println!("Loading tourism snapshots...\n");

    let start = Instant::now();
    let data = TourismData::load_from_dir(data_dir)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (stays, guests, events, weather) = data.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Stays: {}", stays);
    println!("Guests: {}", guests);
    println!("Events: {}", events);
    println!("Weather days: {}", weather);
    println!("\nPerformance: {:.0} stays/second",
             stays as f64 / elapsed.as_secs_f64());
}
