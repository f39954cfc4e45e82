//! Model repository and pipeline execution.
//!
//! The collaborator layer for the composition engine: simple forecasting
//! models, combination rules for aggregating nodes, a descriptor-to-model
//! repository and a runner that turns a pipeline into a forecast. The
//! engine itself only ever sees the metric closures built here.

mod combine;
mod forecaster;
mod repository;
mod runner;

pub use combine::Combiner;
pub use forecaster::{Forecaster, MovingAverage, NaiveDrift, PolyFit};
pub use repository::{
    MEAN, MEDIAN, MOVING_AVERAGE, NAIVE_DRIFT, POLYFIT, build_combiner, build_forecaster,
    primary_candidates, secondary_candidates,
};
pub use runner::{execute, holdout_metric};

/// Errors raised by the model layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("unknown model id '{0}'")]
    UnknownModel(String),

    #[error("model '{id}' cannot use its parameters: {reason}")]
    InvalidParams { id: &'static str, reason: String },

    #[error("model '{id}' needs at least {required} training points, got {actual}")]
    InsufficientData {
        id: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("model '{0}' must be fitted before forecasting")]
    NotFitted(&'static str),

    #[error("aggregating node '{0}' has no upstream forecasts to combine")]
    NoUpstreamForecasts(String),

    #[error("cannot execute an empty pipeline")]
    EmptyPipeline,

    #[error("polynomial system is singular; lower the degree or provide more data")]
    SingularSystem,
}
