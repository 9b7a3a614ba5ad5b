//! Core domain logic for CubeTime: timed group-of-three cube attempts.
//! This crate owns persistence, threshold notifications and statistics.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError};
pub use engine::aggregation::ColorAverage;
pub use engine::analysis::{GroupAnalysis, Pace};
pub use engine::notification::{
    Notification, NotificationKind, HIGH_TIME_THRESHOLD, LOW_TIME_THRESHOLD,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cube::{Cube, CubeId, NewCube};
pub use model::group::{
    FieldError, Group, GroupId, GroupSummary, GroupTime, GroupValidationError, NewGroup,
    CUBES_PER_GROUP,
};
pub use repo::cube_repo::{CubeRepository, SqliteCubeRepository};
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::{RepoError, RepoResult};
pub use service::group_service::{
    GroupService, GroupServiceError, LATEST_GROUP_TIMES_LIMIT, RECENT_GROUPS_LIMIT,
};
pub use service::notification_service::NotificationService;
pub use service::stats_service::StatsService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
