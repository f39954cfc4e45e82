//! Fitness evaluation of candidate topologies.

use std::sync::Arc;

use crate::schema::{Dataset, Pipeline, Topology};

/// Failure reported by an externally supplied metric function.
///
/// The engine treats metrics as black boxes, so their failures travel as
/// plain messages rather than as a typed hierarchy.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct MetricError {
    message: String,
}

impl MetricError {
    /// Wrap a failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Scores candidate topologies against one dataset.
///
/// Stateless between calls: every evaluation binds a fresh pipeline and
/// hands it to the metric. Nothing is cached or retried, and metric
/// failures propagate unchanged.
pub struct FitnessEvaluator {
    data: Arc<Dataset>,
}

impl FitnessEvaluator {
    /// Evaluator bound to a dataset.
    pub fn new(data: Arc<Dataset>) -> Self {
        Self { data }
    }

    /// Dataset candidate pipelines are bound to.
    pub fn data(&self) -> &Arc<Dataset> {
        &self.data
    }

    /// Score one topology with the supplied metric. Lower is better.
    pub fn evaluate<M>(&self, metric: M, topology: &Topology) -> Result<f64, MetricError>
    where
        M: Fn(&Pipeline) -> Result<f64, MetricError>,
    {
        let pipeline = Pipeline::from_topology(topology.clone(), Arc::clone(&self.data));
        metric(&pipeline)
    }
}
