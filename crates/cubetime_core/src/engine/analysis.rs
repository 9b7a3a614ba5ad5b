//! Single-group performance analysis against expected pace.
//!
//! Each cube is expected to take [`EXPECTED_CUBE_TIME`] seconds and a whole
//! group [`EXPECTED_GROUP_TIME`]; deviations beyond [`TOLERANCE`] in either
//! direction are flagged.

use crate::model::cube::CubeId;
use crate::model::group::{Group, GroupId};
use serde::{Deserialize, Serialize};

pub const EXPECTED_CUBE_TIME: f64 = 5.0;
pub const EXPECTED_GROUP_TIME: f64 = 15.0;
pub const TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    /// Slower than expected beyond tolerance.
    Delayed,
    /// Faster than expected beyond tolerance.
    Ahead,
    OnTime,
}

impl Pace {
    fn classify(deviation: f64) -> Self {
        if deviation > TOLERANCE {
            Self::Delayed
        } else if deviation < -TOLERANCE {
            Self::Ahead
        } else {
            Self::OnTime
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeDeviation {
    pub cube_id: CubeId,
    pub color: String,
    pub individual_time: f64,
    /// `individual_time - EXPECTED_CUBE_TIME`.
    pub deviation: f64,
    pub pace: Pace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAnalysis {
    pub group_id: GroupId,
    pub group_time: f64,
    pub expected_group_time: f64,
    /// `group_time - EXPECTED_GROUP_TIME`.
    pub deviation: f64,
    pub verdict: Pace,
    pub cubes: Vec<CubeDeviation>,
    /// Cubes whose pace matches a non-`OnTime` verdict.
    pub causes: Vec<CubeDeviation>,
}

pub fn analyze_group(group: &Group) -> GroupAnalysis {
    let cubes: Vec<CubeDeviation> = group
        .cubes
        .iter()
        .map(|cube| {
            let deviation = cube.individual_time - EXPECTED_CUBE_TIME;
            CubeDeviation {
                cube_id: cube.id,
                color: cube.color.clone(),
                individual_time: cube.individual_time,
                deviation,
                pace: Pace::classify(deviation),
            }
        })
        .collect();

    let deviation = group.group_time - EXPECTED_GROUP_TIME;
    let verdict = Pace::classify(deviation);
    let causes = match verdict {
        Pace::OnTime => Vec::new(),
        _ => cubes
            .iter()
            .filter(|cube| cube.pace == verdict)
            .cloned()
            .collect(),
    };

    GroupAnalysis {
        group_id: group.id,
        group_time: group.group_time,
        expected_group_time: EXPECTED_GROUP_TIME,
        deviation,
        verdict,
        cubes,
        causes,
    }
}
