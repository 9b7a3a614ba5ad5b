//! Pure computations over already-fetched groups and cube timings.
//!
//! Nothing in this module touches storage; services fetch and hand in data.

pub mod aggregation;
pub mod analysis;
pub mod notification;
