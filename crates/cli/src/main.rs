use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{Event, GuestId, TourismData};
use pipeline::ForecastTarget;
use rand::Rng;
use server::{DayPlan, RecommendationOrchestrator, RecommenderConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// Tourism Recs - event recommendations and demand analytics for one city
#[derive(Parser)]
#[command(name = "tourism-recs")]
#[command(about = "Event recommendations from persona, collaborative and content signals", long_about = None)]
struct Cli {
    /// Directory with bookings.csv, events.csv and weather.csv (overrides the config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend events for a guest
    Recommend {
        #[arg(long)]
        guest_id: GuestId,

        /// Number of recommendations (default from config)
        #[arg(short, long)]
        n: Option<usize>,

        /// First day of the event window, YYYY-MM-DD (default: tomorrow)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the event window, YYYY-MM-DD
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Plan recommended events over several days
    Itinerary {
        #[arg(long)]
        guest_id: GuestId,

        #[arg(long)]
        days: Option<usize>,

        #[arg(long)]
        per_day: Option<usize>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },

    /// Show a guest's persona, profile and stays
    Guest {
        #[arg(long)]
        guest_id: GuestId,
    },

    /// Summarise persona clusters
    Personas,

    /// Print daily demand features
    Features {
        /// Only show the last N days
        #[arg(long)]
        last: Option<usize>,
    },

    /// Forecast daily demand or RevPAR
    Forecast {
        #[arg(long, value_enum, default_value = "demand")]
        target: TargetArg,

        #[arg(long)]
        periods: Option<usize>,
    },

    /// Compare bookings on recommended dates with all other dates
    Impact {
        #[arg(long)]
        guest_id: GuestId,

        #[arg(short, long)]
        n: Option<usize>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    Demand,
    Revpar,
}

impl From<TargetArg> for ForecastTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Demand => ForecastTarget::Demand,
            TargetArg::Revpar => ForecastTarget::Revpar,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = RecommenderConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config = config.with_datasets_path(dir);
    }
    info!("Using datasets from {}", config.datasets_path.display());
    let orchestrator = RecommendationOrchestrator::from_config(config)?;

    match cli.command {
        Commands::Recommend {
            guest_id,
            n,
            start,
            end,
            json,
        } => handle_recommend(&orchestrator, guest_id, n, start, end, json)?,
        Commands::Itinerary {
            guest_id,
            days,
            per_day,
            start,
            end,
            json,
        } => handle_itinerary(&orchestrator, guest_id, days, per_day, start, end, json)?,
        Commands::Guest { guest_id } => handle_guest(&orchestrator, guest_id)?,
        Commands::Personas => handle_personas(&orchestrator)?,
        Commands::Features { last } => handle_features(&orchestrator, last)?,
        Commands::Forecast { target, periods } => handle_forecast(&orchestrator, target, periods)?,
        Commands::Impact {
            guest_id,
            n,
            start,
            end,
        } => handle_impact(&orchestrator, guest_id, n, start, end)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    guest_id: GuestId,
    n: Option<usize>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let n = n.unwrap_or(orchestrator.config().default_recommendations);
    let started = Instant::now();
    let recommendations = orchestrator.recommend_events(guest_id, n, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!(
        "{} {} recommendation(s) in {:?}",
        "✓".green(),
        recommendations.len(),
        started.elapsed()
    );
    print_events(guest_id, &recommendations);
    Ok(())
}

/// Handle the 'itinerary' command
fn handle_itinerary(
    orchestrator: &RecommendationOrchestrator,
    guest_id: GuestId,
    days: Option<usize>,
    per_day: Option<usize>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let days = days.unwrap_or(orchestrator.config().default_itinerary_days);
    let per_day = per_day.unwrap_or(orchestrator.config().default_events_per_day);
    let itinerary = orchestrator.build_itinerary(guest_id, days, per_day, start, end)?;

    if json {
        println!("{}", serde_json::json!({ "itinerary": itinerary }));
        return Ok(());
    }
    print_itinerary(guest_id, &itinerary);
    Ok(())
}

/// Handle the 'guest' command
fn handle_guest(orchestrator: &RecommendationOrchestrator, guest_id: GuestId) -> Result<()> {
    let summary = orchestrator.guest_summary(guest_id)?;
    if summary.stays.is_empty() {
        bail!("Guest {} has no stays", guest_id);
    }

    println!("{}", format!("Guest ID: {}", guest_id).bold().blue());
    match summary.persona {
        Some(persona) => println!("{}Persona: {}", "• ".green(), persona),
        None => println!("{}Persona: -", "• ".green()),
    }
    if let Some(profile) = &summary.profile {
        println!("{}Age: {}", "• ".green(), format_opt(profile.age, 0));
        println!("{}Average daily rate: {}", "• ".green(), format_opt(profile.avg_daily_rate, 2));
        println!("{}Total rooms booked: {}", "• ".green(), profile.total_rooms);
        if let Some(country) = profile.country_id {
            println!("{}Country: {}", "• ".green(), country);
        }
    }

    println!("{}Stays: {}", "• ".cyan(), summary.stays.len());
    for stay in summary.stays.iter().take(10) {
        println!(
            "  - {} ({} room(s), {} stars)",
            stay.date,
            stay.rooms(),
            stay.stars.map_or_else(|| "?".to_string(), |s| s.to_string())
        );
    }
    if summary.stays.len() > 10 {
        println!("  ... and {} more", summary.stays.len() - 10);
    }
    Ok(())
}

/// Handle the 'personas' command
fn handle_personas(orchestrator: &RecommendationOrchestrator) -> Result<()> {
    let personas = orchestrator.personas()?;
    println!(
        "{}",
        format!("{} guests in {} personas", personas.len(), personas.n_clusters())
            .bold()
            .blue()
    );
    for summary in personas.summaries() {
        println!(
            "{} {:>3}: {:>6} guests | age {:>5.1} | rate {:>9.2} | rooms {:>5.2}",
            "Persona".green(),
            summary.persona_id,
            summary.members,
            summary.mean_age,
            summary.mean_daily_rate,
            summary.mean_total_rooms
        );
    }
    Ok(())
}

/// Handle the 'features' command
fn handle_features(orchestrator: &RecommendationOrchestrator, last: Option<usize>) -> Result<()> {
    let features = orchestrator.daily_features()?;
    let skip = last.map_or(0, |last| features.len().saturating_sub(last));

    println!(
        "{}",
        format!("{:<10} {:>8} {:>10} {:>9} {:>4} {:>6}", "date", "rooms", "revpar", "events", "rain", "tmax").bold()
    );
    for row in features.iter().skip(skip) {
        println!(
            "{:<10} {:>8} {:>10.2} {:>9} {:>4} {:>6.1}",
            row.date, row.rooms_sold, row.revpar, row.event_intensity, row.rain_flag, row.temperature_max
        );
    }
    Ok(())
}

/// Handle the 'forecast' command
fn handle_forecast(
    orchestrator: &RecommendationOrchestrator,
    target: TargetArg,
    periods: Option<usize>,
) -> Result<()> {
    let periods = periods.unwrap_or(orchestrator.config().default_forecast_periods);
    let forecast = orchestrator.forecast(target.into(), periods)?;
    if forecast.is_empty() {
        println!("{}", "No booking history to forecast from".yellow());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&forecast)?);
    Ok(())
}

/// Handle the 'impact' command
fn handle_impact(
    orchestrator: &RecommendationOrchestrator,
    guest_id: GuestId,
    n: Option<usize>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let n = n.unwrap_or(orchestrator.config().default_recommendations);
    let report = orchestrator.impact_for(guest_id, n, start, end)?;

    println!("{}", format!("Impact for guest {}", guest_id).bold().blue());
    println!("{}Conversion rate: {:.3}", "• ".green(), report.conversion_rate);
    println!(
        "{}Avg rooms with recommendations: {:.3}",
        "• ".green(),
        report.avg_bookings_with_recommendations
    );
    println!(
        "{}Avg rooms without recommendations: {:.3}",
        "• ".green(),
        report.avg_bookings_without_recommendations
    );
    let improvement = format!("{:+.1}%", report.improvement);
    if report.improvement >= 0.0 {
        println!("{}Improvement: {}", "• ".green(), improvement.green());
    } else {
        println!("{}Improvement: {}", "• ".green(), improvement.red());
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Sample guests that actually exist in the snapshot
    let data_dir = orchestrator.config().datasets_path.clone();
    let guest_ids = tokio::task::spawn_blocking(move || TourismData::load_from_dir(&data_dir))
        .await
        .context("Loader task panicked")??
        .guest_ids();
    if guest_ids.is_empty() {
        bail!("No guests to benchmark with");
    }
    let n = orchestrator.config().default_recommendations;
    let sampled: Vec<GuestId> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| guest_ids[rng.random_range(0..guest_ids.len())])
            .collect()
    };

    let orchestrator = Arc::new(orchestrator);
    let limiter = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for guest_id in sampled {
        let orchestrator = orchestrator.clone();
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                orchestrator.recommend_events(guest_id, n, None, None)?;
                Ok::<_, anyhow::Error>(start.elapsed())
            })
            .await?
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall.elapsed();

    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn format_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "?".to_string(), |v| format!("{:.*}", precision, v))
}

/// Helper function to format and print recommendations
fn print_events(guest_id: GuestId, events: &[Event]) {
    println!("{}", format!("Event recommendations for guest {}:", guest_id).bold().blue());
    if events.is_empty() {
        println!("  {}", "No events in the requested window".yellow());
    }
    for (rank, event) in events.iter().enumerate() {
        println!(
            "{}. {} {} [{}] @ {} (attendance {})",
            (rank + 1).to_string().green(),
            event.date,
            event.name.bold(),
            event.event_type,
            event.location,
            event.expected_attendance
        );
    }
}

fn print_itinerary(guest_id: GuestId, itinerary: &[DayPlan]) {
    println!("{}", format!("Itinerary for guest {}:", guest_id).bold().blue());
    if itinerary.is_empty() {
        println!("  {}", "Nothing planned".yellow());
    }
    for plan in itinerary {
        println!("{}", format!("Day {} - {}", plan.day, plan.date).green());
        for event in &plan.events {
            println!(
                "  • {} [{}] @ {} (attendance {})",
                event.name, event.event_type, event.location, event.expected_attendance
            );
        }
    }
}
