//! Per-color timing averages.

use serde::{Deserialize, Serialize};

/// Average `individual_time` for one color label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAverage {
    pub color: String,
    pub average_individual_time: f64,
}

/// Arithmetic mean, or `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pairs `color` with the mean of `times`. An empty set averages to zero.
pub fn average_by_color(color: impl Into<String>, times: &[f64]) -> ColorAverage {
    ColorAverage {
        color: color.into(),
        average_individual_time: mean(times),
    }
}
