//! Forecast accuracy metrics.
//!
//! Standard error measures over a forecast and the values it tried to
//! predict. Lower is better for all of them. Mismatched slice lengths
//! produce NaN rather than a partial comparison.

use serde::{Deserialize, Serialize};

/// Mean absolute error. Same scale as the data.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();
    sum / actual.len() as f64
}

/// Mean squared error. Penalizes large errors more heavily.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    sum / actual.len() as f64
}

/// Root mean squared error. Same scale as the data.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Which accuracy metric scores candidate pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Root mean squared error.
    #[default]
    Rmse,
    /// Mean absolute error.
    Mae,
}

impl MetricKind {
    /// Compute this metric for a forecast.
    pub fn compute(&self, actual: &[f64], predicted: &[f64]) -> f64 {
        match self {
            MetricKind::Rmse => rmse(actual, predicted),
            MetricKind::Mae => mae(actual, predicted),
        }
    }
}
