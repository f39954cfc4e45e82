//! Dataset handle for pipeline evaluation.

use std::fs;
use std::path::Path;

/// Errors raised while preparing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read series file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: cannot parse '{value}' as a number")]
    Parse { line: usize, value: String },

    #[error("series file contains no usable rows")]
    EmptySeries,

    #[error("forecast length must be at least 1")]
    EmptyHorizon,

    #[error("forecast length {forecast_length} leaves no training data for a series of {len} points")]
    HorizonTooLong { forecast_length: usize, len: usize },
}

/// A univariate series plus the horizon a composed pipeline must forecast.
///
/// The holdout tail of `forecast_length` points is withheld from model
/// fitting and used to score candidate pipelines. Both constructors
/// validate, so the horizon always leaves at least one training point.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Observed values, oldest first.
    target: Vec<f64>,
    /// Number of future steps a pipeline must forecast.
    forecast_length: usize,
}

impl Dataset {
    /// Create a dataset, checking the horizon leaves training data.
    pub fn new(target: Vec<f64>, forecast_length: usize) -> Result<Self, DataError> {
        if forecast_length == 0 {
            return Err(DataError::EmptyHorizon);
        }
        if forecast_length >= target.len() {
            return Err(DataError::HorizonTooLong {
                forecast_length,
                len: target.len(),
            });
        }
        Ok(Self {
            target,
            forecast_length,
        })
    }

    /// Load the series from the last column of a CSV file.
    pub fn from_csv(path: impl AsRef<Path>, forecast_length: usize) -> Result<Self, DataError> {
        Self::new(load_series_csv(path)?, forecast_length)
    }

    /// Training slice: everything before the holdout tail.
    pub fn train(&self) -> &[f64] {
        &self.target[..self.target.len() - self.forecast_length]
    }

    /// Holdout tail of `forecast_length` points.
    pub fn holdout(&self) -> &[f64] {
        &self.target[self.target.len() - self.forecast_length..]
    }

    /// Number of future steps a pipeline must forecast.
    pub fn forecast_length(&self) -> usize {
        self.forecast_length
    }

    /// Total number of observations.
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// Read a series from the last column of a CSV file.
///
/// A single non-numeric leading row is treated as a header; any later
/// non-numeric cell is an error. Blank lines are skipped.
pub fn load_series_csv(path: impl AsRef<Path>) -> Result<Vec<f64>, DataError> {
    let text = fs::read_to_string(path)?;
    let mut series = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cell = line.rsplit(',').next().unwrap_or(line).trim();
        match cell.parse::<f64>() {
            Ok(value) => series.push(value),
            Err(_) if line_no == 0 => continue, // header row
            Err(_) => {
                return Err(DataError::Parse {
                    line: line_no + 1,
                    value: cell.to_string(),
                });
            }
        }
    }

    if series.is_empty() {
        return Err(DataError::EmptySeries);
    }
    Ok(series)
}
