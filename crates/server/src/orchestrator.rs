//! # Recommendation Orchestrator
//!
//! This module coordinates a recommendation request end to end:
//! 1. Load a fresh snapshot from the injected `DataSource`
//! 2. Recompute personas
//! 3. Resolve the date window and filter the events table
//! 4. Run the collaborative and content sources on separate copies
//! 5. Merge: collaborative first, unique names, truncate, sort by date
//!
//! Itineraries, persona summaries, daily features, forecasts and impact
//! reports are built on the same per-call snapshot.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use data_loader::{Event, EventId, GuestId, StayRecord, TourismData};
use pipeline::filters::{DateOrderFilter, DateWindow, DateWindowFilter, TruncateFilter, UniqueNameFilter};
use pipeline::{
    build_daily_features, measure_impact, DailyFeatures, FilterPipeline, ForecastPoint,
    ForecastTarget, Forecaster, ImpactReport, SeasonalNaiveForecaster,
};
use sources::{Candidate, CollaborativeSource, ContentSource, GuestProfile, PersonaAssignment, PersonaClusterer, PersonaId};

use crate::config::RecommenderConfig;
use crate::data_source::{CsvDirectory, DataSource};

/// One event inside a day plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryEvent {
    pub event_id: EventId,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub location: String,
    pub expected_attendance: u64,
}

impl From<Event> for ItineraryEvent {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.event_id,
            name: event.name,
            event_type: event.event_type,
            location: event.location,
            expected_attendance: event.expected_attendance,
        }
    }
}

/// Events grouped onto one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    /// 1-based day number within the itinerary
    pub day: usize,
    pub date: NaiveDate,
    pub events: Vec<ItineraryEvent>,
}

/// Everything known about a single guest.
#[derive(Debug, Clone, Serialize)]
pub struct GuestSummary {
    pub guest_id: GuestId,
    pub persona: Option<PersonaId>,
    pub profile: Option<GuestProfile>,
    pub stays: Vec<StayRecord>,
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    source: Arc<dyn DataSource>,
    config: RecommenderConfig,
    collaborative: CollaborativeSource,
    content: ContentSource,
    forecaster: Arc<dyn Forecaster>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over an explicit data source.
    pub fn new(source: Arc<dyn DataSource>, config: RecommenderConfig) -> Result<Self> {
        config.validate().context("Invalid recommender configuration")?;
        info!("Recommendation orchestrator using {}", source.describe());

        Ok(Self {
            source,
            collaborative: CollaborativeSource::new(config.similar_users_count),
            content: ContentSource::new(),
            forecaster: Arc::new(SeasonalNaiveForecaster::new()),
            config,
        })
    }

    /// Create an orchestrator reading CSV files from `config.datasets_path`.
    pub fn from_config(config: RecommenderConfig) -> Result<Self> {
        let source = Arc::new(CsvDirectory::new(config.datasets_path.clone()));
        Self::new(source, config)
    }

    /// Swap the forecasting model (builder pattern)
    pub fn with_forecaster(mut self, forecaster: impl Forecaster + 'static) -> Self {
        self.forecaster = Arc::new(forecaster);
        self
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Main entry point: ordered event recommendations for a guest.
    ///
    /// Without an explicit start the window begins tomorrow (local time).
    pub fn recommend_events(
        &self,
        guest_id: GuestId,
        n: usize,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Event>> {
        let today = Local::now().date_naive();
        self.recommend_events_at(today, guest_id, n, start, end)
    }

    /// Same as [`recommend_events`](Self::recommend_events) with an explicit "today".
    pub fn recommend_events_at(
        &self,
        today: NaiveDate,
        guest_id: GuestId,
        n: usize,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Event>> {
        let data = self.load()?;
        self.recommend_from(&data, today, guest_id, n, start, end)
    }

    /// Blend recommendations from an already loaded snapshot.
    fn recommend_from(
        &self,
        data: &TourismData,
        today: NaiveDate,
        guest_id: GuestId,
        n: usize,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Event>> {
        let start_time = Instant::now();
        let personas = self.cluster(data)?;

        let window = DateWindow::resolve(today, start, end, self.config.default_recommendation_days);
        let window_events = FilterPipeline::new()
            .add_filter(DateWindowFilter::new(window))
            .apply(data.events().to_vec())
            .context("Failed to filter events to the date window")?;
        debug!(
            "Window {} .. {} holds {} events",
            window.start,
            window.end,
            window_events.len()
        );

        let collaborative = self
            .collaborative
            .recommend(window_events.clone(), guest_id, data.stays(), n);
        let content = self
            .content
            .recommend(window_events, guest_id, &personas, data.stays(), n);
        info!(
            "Generated {} collaborative and {} content candidates for guest {}",
            collaborative.len(),
            content.len(),
            guest_id
        );

        let recommendations = self.merge_recommendations(collaborative, content, n)?;
        info!(
            "Selected {} recommendations for guest {} in {:.2?}",
            recommendations.len(),
            guest_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Blend both ranked lists into the final result.
    ///
    /// Collaborative candidates come first so they win name collisions and
    /// survive truncation; the date sort runs after truncation.
    pub fn merge_recommendations(
        &self,
        collaborative: Vec<Candidate>,
        content: Vec<Candidate>,
        n: usize,
    ) -> Result<Vec<Event>> {
        let merged: Vec<Event> = collaborative
            .into_iter()
            .chain(content)
            .map(Candidate::into_event)
            .collect();

        FilterPipeline::new()
            .add_filter(UniqueNameFilter)
            .add_filter(TruncateFilter::new(n))
            .add_filter(DateOrderFilter)
            .apply(merged)
            .context("Failed to blend recommendations")
    }

    /// Group `days * events_per_day` recommendations into day plans.
    ///
    /// At most `days` plans are returned; events on later dates are dropped.
    pub fn build_itinerary(
        &self,
        guest_id: GuestId,
        days: usize,
        events_per_day: usize,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DayPlan>> {
        let recommendations =
            self.recommend_events(guest_id, days.saturating_mul(events_per_day), start, end)?;
        Ok(group_into_days(recommendations, days))
    }

    /// Persona assignment over the current snapshot.
    pub fn personas(&self) -> Result<PersonaAssignment> {
        let data = self.load()?;
        self.cluster(&data)
    }

    pub fn guest_summary(&self, guest_id: GuestId) -> Result<GuestSummary> {
        let data = self.load()?;
        let personas = self.cluster(&data)?;
        Ok(GuestSummary {
            guest_id,
            persona: personas.label_of(guest_id),
            profile: personas.profile(guest_id).cloned(),
            stays: data.get_guest_stays(guest_id).into_iter().cloned().collect(),
        })
    }

    pub fn daily_features(&self) -> Result<Vec<DailyFeatures>> {
        let data = self.load()?;
        Ok(build_daily_features(&data))
    }

    /// Forecast `periods` days past the last stay date.
    pub fn forecast(&self, target: ForecastTarget, periods: usize) -> Result<Vec<ForecastPoint>> {
        let history = self.daily_features()?;
        debug!(
            "Forecasting {:?} with {} over {} history days",
            target,
            self.forecaster.name(),
            history.len()
        );
        Ok(self.forecaster.forecast(&history, target, periods))
    }

    /// Booking impact of the dates recommended to `guest_id`.
    pub fn impact_for(
        &self,
        guest_id: GuestId,
        n: usize,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<ImpactReport> {
        let today = Local::now().date_naive();
        self.impact_for_at(today, guest_id, n, start, end)
    }

    /// Recommendations and stays both come from a single snapshot.
    pub fn impact_for_at(
        &self,
        today: NaiveDate,
        guest_id: GuestId,
        n: usize,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<ImpactReport> {
        let data = self.load()?;
        let recommendations = self.recommend_from(&data, today, guest_id, n, start, end)?;
        Ok(measure_impact(data.stays(), &recommendations))
    }

    fn load(&self) -> Result<TourismData> {
        self.source
            .load()
            .with_context(|| format!("Failed to load snapshot from {}", self.source.describe()))
    }

    fn cluster(&self, data: &TourismData) -> Result<PersonaAssignment> {
        PersonaClusterer::new(self.config.personas_clusters, self.config.random_state)
            .fit(data.stays())
            .context("Failed to cluster guests into personas")
    }
}

/// Split date-sorted events into consecutive per-date plans.
fn group_into_days(events: Vec<Event>, max_days: usize) -> Vec<DayPlan> {
    let mut plans: Vec<DayPlan> = Vec::new();
    for event in events {
        match plans.last_mut() {
            Some(plan) if plan.date == event.date => plan.events.push(event.into()),
            _ => {
                if plans.len() == max_days {
                    break;
                }
                plans.push(DayPlan {
                    day: plans.len() + 1,
                    date: event.date,
                    events: vec![event.into()],
                });
            }
        }
    }
    plans
}
