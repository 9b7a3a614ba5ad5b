//! Group-of-three use-case service.
//!
//! # Responsibility
//! - Validate group input before any persistence attempt.
//! - Translate repository failures into the Validation / NotFound /
//!   Internal taxonomy callers render.
//! - Apply the fixed listing limits.
//!
//! # Invariants
//! - `create_group` never returns a group whose links fail
//!   `Group::check_links()`.
//! - Creation failures are logged here with detail; callers only see the
//!   generic `Internal` variant.

use crate::engine::analysis::{analyze_group, GroupAnalysis};
use crate::model::group::{Group, GroupId, GroupSummary, GroupTime, GroupValidationError, NewGroup};
use crate::repo::group_repo::GroupRepository;
use crate::repo::RepoError;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Upper bound (and default) for recent-group listings.
pub const RECENT_GROUPS_LIMIT: u32 = 5;
/// Upper bound (and default) for the group-time history projection.
pub const LATEST_GROUP_TIMES_LIMIT: u32 = 7;

/// Service error for group use-cases.
#[derive(Debug)]
pub enum GroupServiceError {
    /// Input rejected before persistence.
    Validation(GroupValidationError),
    /// No group with this id.
    NotFound(GroupId),
    /// Unexpected persistence failure.
    Internal(RepoError),
}

impl Display for GroupServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "group not found: {id}"),
            Self::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl Error for GroupServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Internal(err) => Some(err),
        }
    }
}

impl From<RepoError> for GroupServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Internal(other),
        }
    }
}

/// Group service facade over repository implementations.
pub struct GroupService<R: GroupRepository> {
    repo: R,
}

impl<R: GroupRepository> GroupService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a group with its three cubes and returns it fully loaded.
    pub fn create_group(&mut self, input: &NewGroup) -> Result<Group, GroupServiceError> {
        input.validate().map_err(GroupServiceError::Validation)?;

        let started_at = Instant::now();
        info!("event=group_create module=service status=start");
        match self.repo.create_group(input) {
            Ok(group) => {
                info!(
                    "event=group_create module=service status=ok group_id={} duration_ms={}",
                    group.id,
                    started_at.elapsed().as_millis()
                );
                Ok(group)
            }
            Err(err) => {
                error!(
                    "event=group_create module=service status=error duration_ms={} error_code=group_create_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    pub fn get_group(&self, id: GroupId) -> Result<Group, GroupServiceError> {
        match self.repo.get_group(id)? {
            Some(group) => Ok(group),
            None => {
                debug!("event=group_get module=service status=error group_id={id} error_code=not_found");
                Err(GroupServiceError::NotFound(id))
            }
        }
    }

    /// Most recent groups, capped at [`RECENT_GROUPS_LIMIT`].
    pub fn list_recent_groups(&self, limit: Option<u32>) -> Result<Vec<Group>, GroupServiceError> {
        let limit = normalize_limit(limit, RECENT_GROUPS_LIMIT);
        Ok(self.repo.list_recent_groups(limit)?)
    }

    /// `id` + `group_time` history, capped at [`LATEST_GROUP_TIMES_LIMIT`].
    pub fn latest_group_times(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<GroupTime>, GroupServiceError> {
        let limit = normalize_limit(limit, LATEST_GROUP_TIMES_LIMIT);
        Ok(self.repo.latest_group_times(limit)?)
    }

    pub fn analyze_group(&self, id: GroupId) -> Result<GroupAnalysis, GroupServiceError> {
        let group = self.get_group(id)?;
        Ok(analyze_group(&group))
    }

    pub fn summary(&self) -> Result<GroupSummary, GroupServiceError> {
        Ok(self.repo.summary()?)
    }
}

/// `None` and `0` fall back to `max`; larger values clamp to `max`.
pub fn normalize_limit(limit: Option<u32>, max: u32) -> u32 {
    match limit {
        Some(value) if value > 0 => value.min(max),
        _ => max,
    }
}
