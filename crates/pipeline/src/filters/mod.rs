//! Filter implementations for the event pipeline.

pub mod date_order;
pub mod date_window;
pub mod truncate;
pub mod unique_name;

pub use date_order::DateOrderFilter;
pub use date_window::{DateWindow, DateWindowFilter};
pub use truncate::TruncateFilter;
pub use unique_name::UniqueNameFilter;
