//! Combination rules for aggregating nodes.

/// Elementwise combination of upstream forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combiner {
    /// Arithmetic mean across forecasts.
    Mean,
    /// Elementwise median across forecasts.
    Median,
}

impl Combiner {
    /// Combine forecasts of equal length into one.
    ///
    /// Empty input combines to an empty forecast; the pipeline runner
    /// rejects that case before it reaches scoring.
    pub fn combine(&self, forecasts: &[&[f64]]) -> Vec<f64> {
        let Some(first) = forecasts.first() else {
            return Vec::new();
        };
        let steps = first.len();

        match self {
            Combiner::Mean => (0..steps)
                .map(|i| {
                    forecasts.iter().map(|f| f[i]).sum::<f64>() / forecasts.len() as f64
                })
                .collect(),
            Combiner::Median => (0..steps)
                .map(|i| {
                    let mut values: Vec<f64> = forecasts.iter().map(|f| f[i]).collect();
                    values.sort_by(|a, b| a.total_cmp(b));
                    let mid = values.len() / 2;
                    if values.len() % 2 == 0 {
                        (values[mid - 1] + values[mid]) / 2.0
                    } else {
                        values[mid]
                    }
                })
                .collect(),
        }
    }
}
