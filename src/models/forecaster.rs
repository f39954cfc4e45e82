//! Simple forecasting models for primary nodes.

use super::ModelError;

/// A univariate forecasting model.
///
/// Implementations fit on an observed series (oldest first) and forecast
/// a fixed number of steps past its end.
pub trait Forecaster {
    /// Fit the model to an observed series.
    fn fit(&mut self, series: &[f64]) -> Result<(), ModelError>;

    /// Forecast `horizon` steps past the end of the fitted series.
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>, ModelError>;
}

/// Continues the series along the mean slope between its first and last
/// points.
#[derive(Debug, Default)]
pub struct NaiveDrift {
    last: Option<f64>,
    slope: f64,
}

impl NaiveDrift {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for NaiveDrift {
    fn fit(&mut self, series: &[f64]) -> Result<(), ModelError> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(ModelError::InsufficientData {
                    id: "naive_drift",
                    required: 1,
                    actual: 0,
                });
            }
        };

        self.slope = if series.len() > 1 {
            (last - first) / (series.len() - 1) as f64
        } else {
            0.0
        };
        self.last = Some(last);
        Ok(())
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>, ModelError> {
        let last = self.last.ok_or(ModelError::NotFitted("naive_drift"))?;
        Ok((1..=horizon)
            .map(|step| last + self.slope * step as f64)
            .collect())
    }
}

/// Flat forecast at the mean of the last `window` observations.
#[derive(Debug)]
pub struct MovingAverage {
    window: usize,
    level: Option<f64>,
}

impl MovingAverage {
    /// Window must be at least 1.
    pub fn new(window: usize) -> Result<Self, ModelError> {
        if window == 0 {
            return Err(ModelError::InvalidParams {
                id: "moving_average",
                reason: "window must be at least 1".into(),
            });
        }
        Ok(Self {
            window,
            level: None,
        })
    }
}

impl Forecaster for MovingAverage {
    fn fit(&mut self, series: &[f64]) -> Result<(), ModelError> {
        if series.len() < self.window {
            return Err(ModelError::InsufficientData {
                id: "moving_average",
                required: self.window,
                actual: series.len(),
            });
        }
        let tail = &series[series.len() - self.window..];
        self.level = Some(tail.iter().sum::<f64>() / self.window as f64);
        Ok(())
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>, ModelError> {
        let level = self.level.ok_or(ModelError::NotFitted("moving_average"))?;
        Ok(vec![level; horizon])
    }
}

/// Least-squares polynomial trend, extrapolated past the series end.
///
/// Fits by normal equations over x scaled to `[0, 1)`, which keeps the
/// system well conditioned for the supported degrees.
#[derive(Debug)]
pub struct PolyFit {
    degree: usize,
    coefficients: Vec<f64>,
    fitted_len: usize,
}

impl PolyFit {
    /// Degrees 1 through 5 are supported; higher degrees are numerically
    /// fragile under plain normal equations.
    pub fn new(degree: usize) -> Result<Self, ModelError> {
        if degree == 0 || degree > 5 {
            return Err(ModelError::InvalidParams {
                id: "polyfit",
                reason: format!("degree {degree} is outside 1..=5"),
            });
        }
        Ok(Self {
            degree,
            coefficients: Vec::new(),
            fitted_len: 0,
        })
    }
}

impl Forecaster for PolyFit {
    fn fit(&mut self, series: &[f64]) -> Result<(), ModelError> {
        let terms = self.degree + 1;
        if series.len() < terms {
            return Err(ModelError::InsufficientData {
                id: "polyfit",
                required: terms,
                actual: series.len(),
            });
        }

        let scale = series.len() as f64;
        let mut matrix = vec![vec![0.0; terms]; terms];
        let mut rhs = vec![0.0; terms];

        for (i, &y) in series.iter().enumerate() {
            let x = i as f64 / scale;
            let mut powers = Vec::with_capacity(2 * terms - 1);
            let mut power = 1.0;
            for _ in 0..(2 * terms - 1) {
                powers.push(power);
                power *= x;
            }
            for row in 0..terms {
                for col in 0..terms {
                    matrix[row][col] += powers[row + col];
                }
                rhs[row] += powers[row] * y;
            }
        }

        self.coefficients = solve_linear_system(matrix, rhs)?;
        self.fitted_len = series.len();
        Ok(())
    }

    fn forecast(&self, horizon: usize) -> Result<Vec<f64>, ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::NotFitted("polyfit"));
        }
        let scale = self.fitted_len as f64;
        Ok((0..horizon)
            .map(|step| {
                let x = (self.fitted_len + step) as f64 / scale;
                // Horner evaluation, highest coefficient first.
                self.coefficients
                    .iter()
                    .rev()
                    .fold(0.0, |acc, &c| acc * x + c)
            })
            .collect())
    }
}

/// Solve `matrix * x = rhs` by Gaussian elimination with partial pivoting.
fn solve_linear_system(
    mut matrix: Vec<Vec<f64>>,
    mut rhs: Vec<f64>,
) -> Result<Vec<f64>, ModelError> {
    let n = rhs.len();

    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if matrix[row][col].abs() > matrix[pivot][col].abs() {
                pivot = row;
            }
        }
        if matrix[pivot][col].abs() < 1e-12 {
            return Err(ModelError::SingularSystem);
        }
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = rhs[row];
        for col in (row + 1)..n {
            sum -= matrix[row][col] * solution[col];
        }
        solution[row] = sum / matrix[row][row];
    }
    Ok(solution)
}
