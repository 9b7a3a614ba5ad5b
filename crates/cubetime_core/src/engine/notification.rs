//! Threshold notifications over group attempts.
//!
//! # Invariants
//! - A group is "delayed" when `group_time > HIGH_TIME_THRESHOLD` and
//!   "early" when `group_time < LOW_TIME_THRESHOLD`; never both.
//! - The reported cube is the first slowest (delayed) or first fastest
//!   (early) cube in insertion order.
//! - Merged output is ordered by `group_id` descending.

use crate::model::cube::{Cube, CubeId};
use crate::model::group::{Group, GroupId};
use serde::{Deserialize, Serialize};

/// Total seconds above which a group is reported as delayed.
pub const HIGH_TIME_THRESHOLD: f64 = 10.0;
/// Total seconds below which a group is reported as early.
pub const LOW_TIME_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Raised by [`delayed`].
    HighTime,
    /// Raised by [`early`].
    LowTime,
}

/// One group flagged by a threshold, with the cube that explains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub group_id: GroupId,
    pub group_time: f64,
    pub cube_id: CubeId,
    pub color: String,
    pub face: String,
    pub individual_time: f64,
    /// Distance between `group_time` and the crossed threshold.
    pub diff: f64,
}

impl Notification {
    fn new(kind: NotificationKind, group: &Group, cube: &Cube, diff: f64) -> Self {
        Self {
            kind,
            group_id: group.id,
            group_time: group.group_time,
            cube_id: cube.id,
            color: cube.color.clone(),
            face: cube.face.clone(),
            individual_time: cube.individual_time,
            diff,
        }
    }
}

/// Groups slower than [`HIGH_TIME_THRESHOLD`], each with its slowest cube.
pub fn delayed(groups: &[Group]) -> Vec<Notification> {
    groups
        .iter()
        .filter(|group| group.group_time > HIGH_TIME_THRESHOLD)
        .filter_map(|group| {
            slowest_cube(&group.cubes).map(|cube| {
                Notification::new(
                    NotificationKind::HighTime,
                    group,
                    cube,
                    group.group_time - HIGH_TIME_THRESHOLD,
                )
            })
        })
        .collect()
}

/// Groups faster than [`LOW_TIME_THRESHOLD`], each with its fastest cube.
pub fn early(groups: &[Group]) -> Vec<Notification> {
    groups
        .iter()
        .filter(|group| group.group_time < LOW_TIME_THRESHOLD)
        .filter_map(|group| {
            fastest_cube(&group.cubes).map(|cube| {
                Notification::new(
                    NotificationKind::LowTime,
                    group,
                    cube,
                    LOW_TIME_THRESHOLD - group.group_time,
                )
            })
        })
        .collect()
}

/// Concatenates both lists and orders the result by `group_id` descending.
pub fn merge(delayed: Vec<Notification>, early: Vec<Notification>) -> Vec<Notification> {
    let mut merged = delayed;
    merged.extend(early);
    merged.sort_by(|a, b| b.group_id.cmp(&a.group_id));
    merged
}

/// [`delayed`] and [`early`] over the same groups, merged.
pub fn notifications(groups: &[Group]) -> Vec<Notification> {
    merge(delayed(groups), early(groups))
}

fn slowest_cube(cubes: &[Cube]) -> Option<&Cube> {
    cubes.iter().fold(None, |best, cube| match best {
        Some(current) if current.individual_time >= cube.individual_time => Some(current),
        _ => Some(cube),
    })
}

fn fastest_cube(cubes: &[Cube]) -> Option<&Cube> {
    cubes.iter().fold(None, |best, cube| match best {
        Some(current) if current.individual_time <= cube.individual_time => Some(current),
        _ => Some(cube),
    })
}
