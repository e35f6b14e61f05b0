//! Event filtering and analytics stages around the recommenders.
//!
//! This crate provides:
//! - `Filter` trait and implementations for event lists (date window,
//!   name de-duplication, truncation, date ordering)
//! - `FilterPipeline` for composing filters
//! - Daily feature building, impact measurement and a baseline forecaster
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::filters::*;
//! use pipeline::FilterPipeline;
//!
//! let window = FilterPipeline::new()
//!     .add_filter(DateWindowFilter::new(DateWindow::resolve(today, None, None, 30)));
//! let events = window.apply(data.events().to_vec())?;
//!
//! let blend = FilterPipeline::new()
//!     .add_filter(UniqueNameFilter)
//!     .add_filter(TruncateFilter::new(n))
//!     .add_filter(DateOrderFilter);
//! let result = blend.apply(merged)?;
//! ```

pub mod features;
pub mod filter_pipeline;
pub mod filters;
pub mod forecast;
pub mod impact;
pub mod traits;

pub use features::{build_daily_features, DailyFeatures};
pub use filter_pipeline::FilterPipeline;
pub use forecast::{ForecastPoint, ForecastTarget, Forecaster, SeasonalNaiveForecaster};
pub use impact::{measure_impact, ImpactReport};
pub use traits::Filter;
