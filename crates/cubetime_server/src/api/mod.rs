//! HTTP handlers, one module per resource.
//!
//! Handlers stay thin: decode, hand a closure to `AppState::with_conn`,
//! and return JSON.

mod groups;
mod health;
mod notifications;
mod stats;

pub use groups::{analyze_group, create_group, get_group, latest_group_times, list_groups};
pub use health::health;
pub use notifications::{delayed, early, notifications};
pub use stats::{average_by_color, summary};
