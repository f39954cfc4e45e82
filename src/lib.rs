//! Pipeforge - Random-search composition of predictive model pipelines.
//!
//! Pipeforge searches for the best-performing pipeline of forecasting
//! models for a dataset. Each iteration draws a random DAG topology from
//! caller-supplied candidate lists, scores it with a pluggable metric and
//! keeps the strictly best candidate; the full trial history is recorded
//! alongside.
//!
//! # Architecture
//!
//! The crate is split into four modules:
//!
//! - `schema`: Data model (nodes, topologies, pipelines, datasets) and run configuration
//! - `composer`: Sampling, evaluation and the random-search loop
//! - `models`: Forecasting models, combiners and pipeline execution
//! - `metrics`: Forecast accuracy measures
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pipeforge::{
//!     composer::RandomSearchComposer,
//!     metrics::MetricKind,
//!     models,
//!     schema::{ComposerRequirements, Dataset, SearchConfig},
//! };
//!
//! // Target series with an 8-step holdout horizon
//! let series: Vec<f64> = (0..48)
//!     .map(|i| (f64::from(i) * 0.4).sin() + f64::from(i) * 0.1)
//!     .collect();
//! let data = Arc::new(Dataset::new(series, 8).expect("valid horizon"));
//!
//! // Candidate models for each node role
//! let requirements = ComposerRequirements::new(
//!     models::primary_candidates(),
//!     models::secondary_candidates(),
//! );
//! let config = SearchConfig { iterations: 25, random_seed: Some(7) };
//!
//! // Search for the best-scoring pipeline
//! let composer = RandomSearchComposer::new(config);
//! let pipeline = composer
//!     .compose(
//!         Arc::clone(&data),
//!         &requirements,
//!         models::holdout_metric(MetricKind::Rmse),
//!     )
//!     .expect("search failed");
//!
//! println!("composed pipeline: {pipeline}");
//! ```

pub mod composer;
pub mod metrics;
pub mod models;
pub mod schema;

// Re-export commonly used types
pub use composer::{
    ComposeError, FitnessEvaluator, MetricError, RandomSearchComposer, RandomSearchOptimiser,
    SearchResult, StopReason, Trial,
};
pub use schema::{
    ComposerRequirements, Dataset, ModelDescriptor, Pipeline, SearchConfig, Topology,
};
