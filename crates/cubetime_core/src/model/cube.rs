//! Cube timing record.

use crate::model::group::{FieldError, GroupId};
use serde::{Deserialize, Serialize};

/// Row id of a cube in `cubes`.
pub type CubeId = i64;

/// One timed sub-result of a group attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub id: CubeId,
    /// Owning group. `None` only for rows written outside group creation.
    pub group_id: Option<GroupId>,
    pub color: String,
    pub face: String,
    /// Seconds.
    pub individual_time: f64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Input for creating one cube row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCube {
    pub color: String,
    pub face: String,
    pub individual_time: f64,
}

impl NewCube {
    pub fn new(color: impl Into<String>, face: impl Into<String>, individual_time: f64) -> Self {
        Self {
            color: color.into(),
            face: face.into(),
            individual_time,
        }
    }

    /// Appends one error per invalid field, naming fields as `{prefix}color`,
    /// `{prefix}face` and `{prefix}individual_time`.
    pub(crate) fn collect_errors(&self, prefix: &str, errors: &mut Vec<FieldError>) {
        if self.color.trim().is_empty() {
            errors.push(FieldError::required(format!("{prefix}color")));
        }
        if self.face.trim().is_empty() {
            errors.push(FieldError::required(format!("{prefix}face")));
        }
        if !is_valid_seconds(self.individual_time) {
            errors.push(FieldError::non_negative(format!("{prefix}individual_time")));
        }
    }
}

pub(crate) fn is_valid_seconds(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
