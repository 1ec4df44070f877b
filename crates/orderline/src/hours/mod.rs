//! # Restaurant Hours
//!
//! The admin edits a per-weekday table; the storefront asks whether the restaurant is open
//! and when it opens next. [`HoursService`] owns both the store and the [`HoursCache`], so
//! the cache is invalidated exactly when the table is replaced.

pub mod cache;
pub mod error;
pub mod schedule;
pub mod service;
pub mod store;

pub use cache::{HoursCache, ListenerId};
pub use error::HoursError;
pub use schedule::{format_12h, parse_time, DayHours, RestaurantHour, WeeklySchedule};
pub use service::{HoursService, RestaurantStatus};
pub use store::{HoursStore, MemoryHoursStore};
