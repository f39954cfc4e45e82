//! Configuration for composition runs.

use serde::{Deserialize, Serialize};

use crate::metrics::MetricKind;

use super::node::ModelDescriptor;

fn default_iterations() -> usize {
    10
}

/// Settings for the random-search loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of sampling and evaluation iterations.
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Random seed for reproducible searches. Drawn from entropy when
    /// absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            random_seed: None,
        }
    }
}

/// Requirements that cannot produce a valid search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RequirementsError {
    #[error("at least one primary model candidate is required")]
    NoPrimaryCandidates,

    #[error("secondary model candidates are required when more than one primary node may be drawn")]
    NoSecondaryCandidates,
}

/// Candidate models for each node role, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerRequirements {
    /// Models eligible for primary (leaf) nodes. Must not be empty.
    pub primary: Vec<ModelDescriptor>,

    /// Models eligible for the aggregating node. Required whenever more
    /// than one primary node may be drawn.
    #[serde(default)]
    pub secondary: Vec<ModelDescriptor>,
}

impl ComposerRequirements {
    /// Requirements from candidate lists.
    pub fn new(primary: Vec<ModelDescriptor>, secondary: Vec<ModelDescriptor>) -> Self {
        Self { primary, secondary }
    }

    /// Check the candidate lists ahead of a search run.
    pub fn validate(&self) -> Result<(), RequirementsError> {
        Self::check(&self.primary, &self.secondary)
    }

    /// Slice-level validation shared with the optimiser, which receives
    /// the lists as slices rather than as a requirements value.
    pub(crate) fn check(
        primary: &[ModelDescriptor],
        secondary: &[ModelDescriptor],
    ) -> Result<(), RequirementsError> {
        if primary.is_empty() {
            return Err(RequirementsError::NoPrimaryCandidates);
        }
        if primary.len() > 1 && secondary.is_empty() {
            return Err(RequirementsError::NoSecondaryCandidates);
        }
        Ok(())
    }
}

/// Top-level configuration for a composition run, as consumed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionConfig {
    /// Candidate models for each node role.
    pub requirements: ComposerRequirements,

    /// Search loop settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Holdout metric used to score candidate pipelines.
    #[serde(default)]
    pub metric: MetricKind,
}

impl CompositionConfig {
    /// Validate the configuration before running.
    pub fn validate(&self) -> Result<(), RequirementsError> {
        self.requirements.validate()
    }
}
