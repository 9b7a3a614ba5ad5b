//! Group-of-three record, create input and validation errors.
//!
//! # Invariants
//! - `NewGroup::validate()` must pass before any row is written.
//! - `cube_1..3` mirror, in order, the ids of the cubes whose `group_id`
//!   equals the group id. `Group::check_links()` enforces this on reads.

use crate::model::cube::{is_valid_seconds, Cube, CubeId, NewCube};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row id of a group in `group_of_three`.
pub type GroupId = i64;

/// Number of cubes every group carries.
pub const CUBES_PER_GROUP: usize = 3;

/// One timed attempt with its three cube sub-results attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub cube_1: Option<CubeId>,
    pub cube_2: Option<CubeId>,
    pub cube_3: Option<CubeId>,
    /// Total seconds for the attempt.
    pub group_time: f64,
    /// Unix epoch milliseconds. Drives recency ordering.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    /// Child cubes in insertion order.
    pub cubes: Vec<Cube>,
}

impl Group {
    /// Denormalized cube links in slot order.
    pub fn linked_cube_ids(&self) -> [Option<CubeId>; CUBES_PER_GROUP] {
        [self.cube_1, self.cube_2, self.cube_3]
    }

    /// Verifies that the denormalized `cube_1..3` links and the reverse
    /// relation agree.
    ///
    /// # Errors
    /// Returns a description of the first mismatch found.
    pub fn check_links(&self) -> Result<(), String> {
        if self.cubes.len() != CUBES_PER_GROUP {
            return Err(format!(
                "group {} has {} cubes, expected {CUBES_PER_GROUP}",
                self.id,
                self.cubes.len()
            ));
        }

        for (slot, (link, cube)) in self.linked_cube_ids().iter().zip(&self.cubes).enumerate() {
            if cube.group_id != Some(self.id) {
                return Err(format!(
                    "cube {} is attached to group {} but references {:?}",
                    cube.id, self.id, cube.group_id
                ));
            }
            if *link != Some(cube.id) {
                return Err(format!(
                    "group {} cube_{} is {:?}, expected {}",
                    self.id,
                    slot + 1,
                    link,
                    cube.id
                ));
            }
        }

        Ok(())
    }
}

/// Lightweight `id` + `group_time` projection used for history charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTime {
    pub id: GroupId,
    pub group_time: f64,
}

/// Store-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub total_groups: u64,
    pub total_cubes: u64,
    pub total_group_time: f64,
}

/// Input for creating one group with its three cubes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroup {
    pub group_time: f64,
    pub cubes: Vec<NewCube>,
}

impl NewGroup {
    pub fn new(group_time: f64, cubes: Vec<NewCube>) -> Self {
        Self { group_time, cubes }
    }

    /// Checks every field and reports all problems at once.
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        let mut errors = Vec::new();

        if !is_valid_seconds(self.group_time) {
            errors.push(FieldError::non_negative("group_time"));
        }
        if self.cubes.len() != CUBES_PER_GROUP {
            errors.push(FieldError::new(
                "cubes",
                format!("The cubes field must contain exactly {CUBES_PER_GROUP} items."),
            ));
        }
        for (index, cube) in self.cubes.iter().enumerate() {
            cube.collect_errors(&format!("cubes.{index}."), &mut errors);
        }

        GroupValidationError::check(errors)
    }
}

/// One invalid input field, keyed by its dotted path (`cubes.0.color`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("The {field} field is required.");
        Self { field, message }
    }

    pub fn non_negative(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("The {field} field must be a non-negative number.");
        Self { field, message }
    }
}

/// Group input rejected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupValidationError {
    errors: Vec<FieldError>,
}

impl GroupValidationError {
    /// `Ok(())` when `errors` is empty.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

impl Display for GroupValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid group input:")?;
        for error in &self.errors {
            write!(f, " {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl Error for GroupValidationError {}
