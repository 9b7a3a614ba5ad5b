//! Notification use-case service.
//!
//! Every call fetches the full group set once and classifies it in memory.

use crate::engine::notification::{self, Notification};
use crate::model::group::Group;
use crate::repo::group_repo::GroupRepository;
use crate::repo::RepoResult;
use log::debug;

pub struct NotificationService<R: GroupRepository> {
    repo: R,
}

impl<R: GroupRepository> NotificationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Groups above the high-time threshold.
    pub fn delayed(&self) -> RepoResult<Vec<Notification>> {
        self.compute("delayed", notification::delayed)
    }

    /// Groups below the low-time threshold.
    pub fn early(&self) -> RepoResult<Vec<Notification>> {
        self.compute("early", notification::early)
    }

    /// Delayed and early notifications merged, `group_id` descending.
    pub fn notifications(&self) -> RepoResult<Vec<Notification>> {
        self.compute("all", notification::notifications)
    }

    fn compute(
        &self,
        scope: &str,
        classify: fn(&[Group]) -> Vec<Notification>,
    ) -> RepoResult<Vec<Notification>> {
        let groups = self.repo.list_all_groups()?;
        let result = classify(&groups);
        debug!(
            "event=notifications_compute module=service status=ok scope={scope} groups={} notifications={}",
            groups.len(),
            result.len()
        );
        Ok(result)
    }
}
