//! Random-search composition: the optimiser loop and its caller-facing
//! façade.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::schema::{
    ComposerRequirements, Dataset, ModelDescriptor, NodeFactory, Pipeline, RequirementsError,
    SearchConfig, StandardNodeFactory, Topology,
};

use super::evaluator::{FitnessEvaluator, MetricError};
use super::sampler::{SamplerRng, TopologySampler};

/// Recorded scores are kept to three decimal places.
const SCORE_DECIMALS: i32 = 3;

/// Round a raw metric value to the precision scores are recorded at.
fn round_score(raw: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (raw * factor).round() / factor
}

/// One sampled topology and the rounded score it achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    /// The sampled topology.
    pub topology: Topology,
    /// Its metric score, rounded to three decimal places. Lower is better.
    pub score: f64,
}

/// Why a search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All budgeted iterations ran.
    BudgetExhausted,
    /// The cancellation handle was set.
    Cancelled,
}

/// Outcome of one optimiser run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best trial seen. None when no iteration produced a comparable
    /// (non-NaN) score.
    pub best: Option<Trial>,
    /// Every trial in generation order, including the best.
    pub history: Vec<Trial>,
    /// Why the run stopped.
    pub stop_reason: StopReason,
}

impl SearchResult {
    /// Score of the best trial, if any.
    pub fn best_score(&self) -> Option<f64> {
        self.best.as_ref().map(|trial| trial.score)
    }
}

/// Progress update emitted once per completed iteration.
#[derive(Debug, Clone)]
pub struct SearchProgress {
    /// Iteration index, starting at 0.
    pub iteration: usize,
    /// Total iterations budgeted.
    pub budget: usize,
    /// Rounded score of this iteration's topology.
    pub score: f64,
    /// Node count of this iteration's topology.
    pub nodes: usize,
    /// Best score seen so far, including this iteration.
    pub best_score: Option<f64>,
    /// Whether this iteration improved on the previous best.
    pub improved: bool,
}

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(&SearchProgress) + Send + Sync>;

/// Errors surfaced by the composition engine.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// The requirement lists cannot produce a valid run.
    #[error("invalid composer requirements: {0}")]
    InvalidRequirements(#[from] RequirementsError),

    /// The metric failed. The run is aborted and its partial history
    /// discarded.
    #[error("evaluation failed at iteration {iteration}: {source}")]
    Evaluation {
        /// Zero-based iteration the failure occurred in.
        iteration: usize,
        #[source]
        source: MetricError,
    },
}

/// Bounded random search over pipeline topologies.
///
/// Each iteration draws one topology, scores it and appends the pair to
/// the history; a strictly better score replaces the incumbent best, so
/// ties keep the earlier trial. NaN scores enter the history but never
/// the best slot. Iterations are strictly sequential and nothing stops
/// the run early except the cancellation handle.
pub struct RandomSearchOptimiser<F> {
    config: SearchConfig,
    sampler: TopologySampler<F>,
    evaluator: FitnessEvaluator,
    cancelled: Arc<AtomicBool>,
}

impl<F: NodeFactory> RandomSearchOptimiser<F> {
    /// Optimiser from search settings, a node factory and an evaluator
    /// bound to the target dataset.
    pub fn new(config: SearchConfig, factory: F, evaluator: FitnessEvaluator) -> Self {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let sampler = TopologySampler::new(factory, SamplerRng::new(seed));

        Self {
            config,
            sampler,
            evaluator,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get cancellation handle. Setting it stops the run at the next
    /// iteration boundary; completed trials stay in the result.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run the search (blocking).
    pub fn optimise<M>(
        &mut self,
        metric: M,
        primary: &[ModelDescriptor],
        secondary: &[ModelDescriptor],
    ) -> Result<SearchResult, ComposeError>
    where
        M: Fn(&Pipeline) -> Result<f64, MetricError>,
    {
        self.optimise_with_callback(metric, primary, secondary, |_| {})
    }

    /// Run the search, reporting progress after every iteration.
    pub fn optimise_with_callback<M, C>(
        &mut self,
        metric: M,
        primary: &[ModelDescriptor],
        secondary: &[ModelDescriptor],
        callback: C,
    ) -> Result<SearchResult, ComposeError>
    where
        M: Fn(&Pipeline) -> Result<f64, MetricError>,
        C: Fn(&SearchProgress),
    {
        ComposerRequirements::check(primary, secondary)?;

        let budget = self.config.iterations;
        let mut best: Option<Trial> = None;
        let mut history = Vec::with_capacity(budget);
        let mut stop_reason = StopReason::BudgetExhausted;

        log::info!(
            "starting random search: {budget} iteration(s), {} primary / {} secondary candidate(s)",
            primary.len(),
            secondary.len()
        );

        for iteration in 0..budget {
            if self.cancelled.load(Ordering::Relaxed) {
                log::info!("search cancelled at iteration {iteration}");
                stop_reason = StopReason::Cancelled;
                break;
            }

            let topology = self.sampler.sample(primary, secondary);
            let raw = self
                .evaluator
                .evaluate(&metric, &topology)
                .map_err(|source| ComposeError::Evaluation { iteration, source })?;
            let score = round_score(raw);
            let nodes = topology.len();

            log::debug!("iteration {iteration}: score {score} for {nodes} node(s)");

            history.push(Trial {
                topology: topology.clone(),
                score,
            });

            // NaN is recorded in history but never occupies the best slot.
            let improved = match &best {
                Some(incumbent) => score < incumbent.score,
                None => !score.is_nan(),
            };
            if improved {
                log::info!("better pipeline found: score {score} ({topology})");
                best = Some(Trial { topology, score });
            }

            callback(&SearchProgress {
                iteration,
                budget,
                score,
                nodes,
                best_score: best.as_ref().map(|trial| trial.score),
                improved,
            });
        }

        Ok(SearchResult {
            best,
            history,
            stop_reason,
        })
    }
}

/// Translates caller requirements into a search run and hands back the
/// winning pipeline.
///
/// The façade owns nothing across calls: every `compose` builds a fresh
/// optimiser, so repeated calls with the same seeded config reproduce the
/// same search.
pub struct RandomSearchComposer<F = StandardNodeFactory> {
    config: SearchConfig,
    factory: F,
}

impl RandomSearchComposer<StandardNodeFactory> {
    /// Composer with the standard node factory.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            factory: StandardNodeFactory,
        }
    }
}

impl<F: NodeFactory + Clone> RandomSearchComposer<F> {
    /// Composer with a caller-supplied node factory.
    pub fn with_factory(config: SearchConfig, factory: F) -> Self {
        Self { config, factory }
    }

    /// Search for the best pipeline for `data` under `requirements`.
    ///
    /// Returns an empty pipeline when no trial produced a comparable
    /// score (a zero budget, or every score NaN); check
    /// `Pipeline::is_empty` before executing the result.
    pub fn compose<M>(
        &self,
        data: Arc<Dataset>,
        requirements: &ComposerRequirements,
        metric: M,
    ) -> Result<Pipeline, ComposeError>
    where
        M: Fn(&Pipeline) -> Result<f64, MetricError>,
    {
        self.compose_with_callback(data, requirements, metric, |_| {})
    }

    /// `compose`, reporting per-iteration progress.
    pub fn compose_with_callback<M, C>(
        &self,
        data: Arc<Dataset>,
        requirements: &ComposerRequirements,
        metric: M,
        callback: C,
    ) -> Result<Pipeline, ComposeError>
    where
        M: Fn(&Pipeline) -> Result<f64, MetricError>,
        C: Fn(&SearchProgress),
    {
        let evaluator = FitnessEvaluator::new(Arc::clone(&data));
        let mut optimiser =
            RandomSearchOptimiser::new(self.config.clone(), self.factory.clone(), evaluator);

        let result = optimiser.optimise_with_callback(
            metric,
            &requirements.primary,
            &requirements.secondary,
            callback,
        )?;

        let topology = result
            .best
            .map(|trial| trial.topology)
            .unwrap_or_default();
        Ok(Pipeline::from_topology(topology, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use crate::metrics::MetricKind;
    use crate::models;

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::new((0..20).map(f64::from).collect(), 5).unwrap())
    }

    fn descriptors(ids: &[&str]) -> Vec<ModelDescriptor> {
        ids.iter().map(|id| ModelDescriptor::named(*id)).collect()
    }

    fn optimiser(iterations: usize, seed: u64) -> RandomSearchOptimiser<StandardNodeFactory> {
        let config = SearchConfig {
            iterations,
            random_seed: Some(seed),
        };
        RandomSearchOptimiser::new(config, StandardNodeFactory, FitnessEvaluator::new(dataset()))
    }

    /// Metric returning scripted values in call order.
    fn scripted<'a>(
        calls: &'a Cell<usize>,
        scores: &'a [f64],
    ) -> impl Fn(&Pipeline) -> Result<f64, MetricError> + 'a {
        move |_| {
            let index = calls.get();
            calls.set(index + 1);
            Ok(scores[index])
        }
    }

    #[test]
    fn test_history_records_every_iteration() {
        let result = optimiser(7, 42)
            .optimise(
                |pipeline: &Pipeline| Ok(pipeline.len() as f64),
                &descriptors(&["a", "b"]),
                &descriptors(&["mean"]),
            )
            .unwrap();

        assert_eq!(result.history.len(), 7);
        assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
        assert!(result.best.is_some());
    }

    #[test]
    fn test_best_is_the_earliest_minimum() {
        let calls = Cell::new(0);
        let scores = [5.0, 3.0, 4.0, 3.0, 6.0];

        let result = optimiser(scores.len(), 7)
            .optimise(
                scripted(&calls, &scores),
                &descriptors(&["a", "b", "c"]),
                &descriptors(&["mean"]),
            )
            .unwrap();

        let best = result.best.unwrap();
        assert_eq!(best.score, 3.0);
        // Ties keep the earlier trial: iteration 1, not iteration 3.
        assert_eq!(best.topology, result.history[1].topology);
        assert_eq!(
            result.history.iter().map(|t| t.score).collect::<Vec<_>>(),
            scores
        );
    }

    #[test]
    fn test_nan_scores_never_become_best() {
        let calls = Cell::new(0);
        let scores = [f64::NAN, 1.0, 2.0];

        let result = optimiser(scores.len(), 13)
            .optimise(
                scripted(&calls, &scores),
                &descriptors(&["a", "b"]),
                &descriptors(&["mean"]),
            )
            .unwrap();

        // The NaN trial stays in the history; the finite minimum wins.
        assert_eq!(result.history.len(), 3);
        assert!(result.history[0].score.is_nan());
        assert_eq!(result.best_score(), Some(1.0));
    }

    #[test]
    fn test_all_nan_scores_yield_no_best() {
        let calls = Cell::new(0);
        let scores = [f64::NAN, f64::NAN];

        let result = optimiser(scores.len(), 13)
            .optimise(
                scripted(&calls, &scores),
                &descriptors(&["a", "b"]),
                &descriptors(&["mean"]),
            )
            .unwrap();

        assert!(result.best.is_none());
        assert_eq!(result.history.len(), 2);
        assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
    }

    #[test]
    fn test_zero_budget_yields_no_best() {
        let result = optimiser(0, 1)
            .optimise(
                |_: &Pipeline| Ok(1.0),
                &descriptors(&["a"]),
                &[],
            )
            .unwrap();

        assert!(result.best.is_none());
        assert!(result.best_score().is_none());
        assert!(result.history.is_empty());
        assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
    }

    #[test]
    fn test_single_candidate_search() {
        let result = optimiser(5, 99)
            .optimise(
                |pipeline: &Pipeline| Ok(pipeline.len() as f64),
                &descriptors(&["only"]),
                &[],
            )
            .unwrap();

        assert_eq!(result.history.len(), 5);
        for trial in &result.history {
            assert_eq!(trial.topology.len(), 1);
            assert_eq!(trial.topology.nodes()[0].descriptor.id, "only");
        }
        assert_eq!(result.best_score(), Some(1.0));
    }

    #[test]
    fn test_metric_failure_aborts_the_run() {
        let calls = Cell::new(0);
        let metric = |_: &Pipeline| {
            let index = calls.get();
            calls.set(index + 1);
            if index == 2 {
                Err(MetricError::new("fit failed"))
            } else {
                Ok(1.0)
            }
        };

        let err = optimiser(10, 5)
            .optimise(metric, &descriptors(&["a", "b"]), &descriptors(&["mean"]))
            .unwrap_err();

        match err {
            ComposeError::Evaluation { iteration, source } => {
                assert_eq!(iteration, 2);
                assert_eq!(source.to_string(), "fit failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_primary_candidates_are_rejected() {
        let err = optimiser(3, 0)
            .optimise(|_: &Pipeline| Ok(1.0), &[], &descriptors(&["mean"]))
            .unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidRequirements(RequirementsError::NoPrimaryCandidates)
        ));
    }

    #[test]
    fn test_missing_secondary_candidates_are_rejected() {
        let err = optimiser(3, 0)
            .optimise(|_: &Pipeline| Ok(1.0), &descriptors(&["a", "b"]), &[])
            .unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidRequirements(RequirementsError::NoSecondaryCandidates)
        ));
    }

    #[test]
    fn test_cancellation_before_the_run() {
        let mut optimiser = optimiser(100, 3);
        optimiser.cancel_handle().store(true, Ordering::Relaxed);

        let result = optimiser
            .optimise(
                |_: &Pipeline| Ok(1.0),
                &descriptors(&["a"]),
                &[],
            )
            .unwrap();

        assert!(result.history.is_empty());
        assert!(result.best.is_none());
        assert_eq!(result.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn test_scores_are_rounded_to_three_decimals() {
        assert_eq!(round_score(1.23456), 1.235);
        assert_eq!(round_score(2.0004), 2.0);
        assert_eq!(round_score(-0.12349), -0.123);
        assert!(round_score(f64::NAN).is_nan());

        let result = optimiser(1, 11)
            .optimise(
                |_: &Pipeline| Ok(0.123456789),
                &descriptors(&["a"]),
                &[],
            )
            .unwrap();
        assert_eq!(result.history[0].score, 0.123);
        assert_eq!(result.best_score(), Some(0.123));
    }

    #[test]
    fn test_callback_sees_every_iteration() {
        let seen: RefCell<Vec<SearchProgress>> = RefCell::new(Vec::new());

        optimiser(4, 21)
            .optimise_with_callback(
                |pipeline: &Pipeline| Ok(pipeline.len() as f64),
                &descriptors(&["a", "b"]),
                &descriptors(&["mean"]),
                |progress| seen.borrow_mut().push(progress.clone()),
            )
            .unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 4);
        for (index, progress) in seen.iter().enumerate() {
            assert_eq!(progress.iteration, index);
            assert_eq!(progress.budget, 4);
            assert!(progress.best_score.is_some());
        }
        // The first iteration always improves on an empty incumbent.
        assert!(seen[0].improved);
    }

    #[test]
    fn test_identical_seeds_reproduce_searches() {
        let primary = descriptors(&["a", "b", "c"]);
        let secondary = descriptors(&["mean", "median"]);
        let metric = |pipeline: &Pipeline| Ok(pipeline.len() as f64);

        let first = optimiser(12, 77).optimise(metric, &primary, &secondary).unwrap();
        let second = optimiser(12, 77).optimise(metric, &primary, &secondary).unwrap();

        assert_eq!(first.history, second.history);
        assert_eq!(first.best, second.best);
    }

    #[test]
    fn test_compose_returns_the_best_pipeline() {
        let config = SearchConfig {
            iterations: 8,
            random_seed: Some(4),
        };
        let composer = RandomSearchComposer::new(config);
        let requirements =
            ComposerRequirements::new(descriptors(&["a", "b"]), descriptors(&["mean"]));

        let pipeline = composer
            .compose(dataset(), &requirements, |pipeline: &Pipeline| {
                Ok(pipeline.len() as f64)
            })
            .unwrap();

        assert!(!pipeline.is_empty());
        assert!(pipeline.len() == 1 || pipeline.len() == 3);
    }

    #[test]
    fn test_compose_with_the_model_repository() {
        // A clean trend every repository model can fit.
        let series: Vec<f64> = (0..40).map(|i| 4.0 + 1.5 * f64::from(i)).collect();
        let data = Arc::new(Dataset::new(series, 6).unwrap());

        let config = SearchConfig {
            iterations: 20,
            random_seed: Some(11),
        };
        let requirements = ComposerRequirements::new(
            models::primary_candidates(),
            models::secondary_candidates(),
        );

        let composer = RandomSearchComposer::new(config);
        let pipeline = composer
            .compose(
                Arc::clone(&data),
                &requirements,
                models::holdout_metric(MetricKind::Rmse),
            )
            .unwrap();

        assert!(!pipeline.is_empty());
        let score = models::holdout_metric(MetricKind::Rmse)(&pipeline).unwrap();
        assert!(score.is_finite());
    }

    #[test]
    fn test_compose_with_zero_budget_is_empty() {
        let config = SearchConfig {
            iterations: 0,
            random_seed: Some(4),
        };
        let composer = RandomSearchComposer::new(config);
        let requirements = ComposerRequirements::new(descriptors(&["a"]), Vec::new());

        let pipeline = composer
            .compose(dataset(), &requirements, |_: &Pipeline| Ok(1.0))
            .unwrap();

        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_compose_validates_requirements() {
        let composer = RandomSearchComposer::new(SearchConfig::default());
        let requirements = ComposerRequirements::new(Vec::new(), Vec::new());

        let err = composer
            .compose(dataset(), &requirements, |_: &Pipeline| Ok(1.0))
            .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidRequirements(_)));
    }
}
