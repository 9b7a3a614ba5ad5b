//! HTTP surface for CubeTime.
//!
//! Thin axum layer over `cubetime_core`: JSON in, JSON out, one shared
//! SQLite connection.

pub mod api;
pub mod config;
pub mod error;
pub mod payload;
pub mod router;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
