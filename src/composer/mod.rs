//! Random-search composition engine.
//!
//! Composes pipelines of forecasting models by drawing random topologies
//! and keeping the best-scoring one under a caller-supplied metric.
//!
//! # Overview
//!
//! The engine splits into three pieces:
//!
//! - **Sampler** ([`TopologySampler`]): draws random DAG topologies from
//!   the candidate model lists. All randomness lives behind its injected
//!   [`SamplerRng`].
//! - **Evaluator** ([`FitnessEvaluator`]): binds a topology to the target
//!   dataset and scores it with the metric function. Lower is better.
//! - **Optimiser** ([`RandomSearchOptimiser`]): runs the budgeted
//!   sample-evaluate loop, records every trial and keeps the strictly
//!   best one.
//!
//! [`RandomSearchComposer`] wraps the three behind a single `compose`
//! call for callers that only want the winning pipeline.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pipeforge::composer::{FitnessEvaluator, RandomSearchOptimiser};
//! use pipeforge::schema::{Dataset, ModelDescriptor, SearchConfig, StandardNodeFactory};
//!
//! let data = Arc::new(Dataset::new((0..32).map(f64::from).collect(), 4).expect("valid horizon"));
//! let config = SearchConfig { iterations: 20, random_seed: Some(42) };
//! let mut optimiser = RandomSearchOptimiser::new(
//!     config,
//!     StandardNodeFactory,
//!     FitnessEvaluator::new(Arc::clone(&data)),
//! );
//!
//! let primary = vec![ModelDescriptor::named("polyfit"), ModelDescriptor::named("naive_drift")];
//! let secondary = vec![ModelDescriptor::named("mean")];
//!
//! let result = optimiser
//!     .optimise(|pipeline| Ok(pipeline.len() as f64), &primary, &secondary)
//!     .expect("valid requirements");
//! println!("best score: {:?}", result.best_score());
//! ```

mod evaluator;
mod random_search;
mod sampler;

pub use evaluator::{FitnessEvaluator, MetricError};
pub use random_search::{
    ComposeError, ProgressCallback, RandomSearchComposer, RandomSearchOptimiser, SearchProgress,
    SearchResult, StopReason, Trial,
};
pub use sampler::{SamplerRng, TopologySampler};
