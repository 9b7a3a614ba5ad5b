//! Domain model for timed group-of-three attempts.
//!
//! # Responsibility
//! - Define the persisted shapes (`Cube`, `Group`) and their create inputs.
//! - Own field-level input validation for group creation.
//!
//! # Invariants
//! - A fully created group has exactly three cubes, linked both ways.
//! - Records are append-only; there are no update or delete shapes.

pub mod cube;
pub mod group;
