//! Pipeline execution and holdout scoring.

use crate::composer::MetricError;
use crate::metrics::MetricKind;
use crate::schema::{NodeKind, Pipeline};

use super::ModelError;
use super::repository::{build_combiner, build_forecaster};

/// Produce the pipeline's forecast over the dataset's horizon.
///
/// Nodes run in topology order: each primary fits on the training slice
/// and forecasts the horizon, each aggregating node combines the outputs
/// of its upstream nodes. The output of the final node is the pipeline's
/// forecast.
pub fn execute(pipeline: &Pipeline) -> Result<Vec<f64>, ModelError> {
    let data = pipeline.data();
    let train = data.train();
    let horizon = data.forecast_length();

    let mut outputs: Vec<Vec<f64>> = Vec::with_capacity(pipeline.len());
    for node in pipeline.nodes() {
        let output = match node.kind {
            NodeKind::Primary => {
                let mut model = build_forecaster(&node.descriptor)?;
                model.fit(train)?;
                model.forecast(horizon)?
            }
            NodeKind::Secondary => {
                if node.upstream.is_empty() {
                    return Err(ModelError::NoUpstreamForecasts(node.descriptor.id.clone()));
                }
                let upstream: Vec<&[f64]> = node
                    .upstream
                    .iter()
                    .map(|&id| outputs[id].as_slice())
                    .collect();
                build_combiner(&node.descriptor)?.combine(&upstream)
            }
        };
        outputs.push(output);
    }

    outputs.pop().ok_or(ModelError::EmptyPipeline)
}

/// Metric closure scoring pipelines by holdout accuracy. Lower is better.
///
/// Fits on the training slice, forecasts the horizon and compares against
/// the holdout tail. Model failures surface as metric errors; they are
/// never converted into a score.
pub fn holdout_metric(kind: MetricKind) -> impl Fn(&Pipeline) -> Result<f64, MetricError> {
    move |pipeline: &Pipeline| {
        let forecast = execute(pipeline).map_err(|e| MetricError::new(e.to_string()))?;
        Ok(kind.compute(pipeline.data().holdout(), &forecast))
    }
}
