//! Color statistics use-case service.

use crate::engine::aggregation::{average_by_color, ColorAverage};
use crate::repo::cube_repo::CubeRepository;
use crate::repo::RepoResult;

pub struct StatsService<R: CubeRepository> {
    repo: R,
}

impl<R: CubeRepository> StatsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Mean `individual_time` of all cubes with exactly this color.
    ///
    /// Unknown colors average to `0.0` rather than failing.
    pub fn average_by_color(&self, color: &str) -> RepoResult<ColorAverage> {
        let times = self.repo.individual_times_by_color(color)?;
        Ok(average_by_color(color, &times))
    }
}
