//! Descriptor-to-model construction.

use crate::schema::ModelDescriptor;

use super::ModelError;
use super::combine::Combiner;
use super::forecaster::{Forecaster, MovingAverage, NaiveDrift, PolyFit};

/// Model id for the polynomial trend forecaster.
pub const POLYFIT: &str = "polyfit";
/// Model id for the drift-continuation forecaster.
pub const NAIVE_DRIFT: &str = "naive_drift";
/// Model id for the moving-average forecaster.
pub const MOVING_AVERAGE: &str = "moving_average";
/// Model id for the mean combiner.
pub const MEAN: &str = "mean";
/// Model id for the median combiner.
pub const MEDIAN: &str = "median";

/// Descriptors for every primary model the repository can build.
pub fn primary_candidates() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::named(POLYFIT),
        ModelDescriptor::named(NAIVE_DRIFT),
        ModelDescriptor::named(MOVING_AVERAGE),
    ]
}

/// Descriptors for every aggregating model the repository can build.
pub fn secondary_candidates() -> Vec<ModelDescriptor> {
    vec![ModelDescriptor::named(MEAN), ModelDescriptor::named(MEDIAN)]
}

/// Build the forecaster a primary node's descriptor selects.
pub fn build_forecaster(descriptor: &ModelDescriptor) -> Result<Box<dyn Forecaster>, ModelError> {
    match descriptor.id.as_str() {
        POLYFIT => {
            let degree = param_usize(descriptor, "degree", 2, POLYFIT)?;
            Ok(Box::new(PolyFit::new(degree)?))
        }
        NAIVE_DRIFT => Ok(Box::new(NaiveDrift::new())),
        MOVING_AVERAGE => {
            let window = param_usize(descriptor, "window", 3, MOVING_AVERAGE)?;
            Ok(Box::new(MovingAverage::new(window)?))
        }
        other => Err(ModelError::UnknownModel(other.to_string())),
    }
}

/// Build the combiner an aggregating node's descriptor selects.
pub fn build_combiner(descriptor: &ModelDescriptor) -> Result<Combiner, ModelError> {
    match descriptor.id.as_str() {
        MEAN => Ok(Combiner::Mean),
        MEDIAN => Ok(Combiner::Median),
        other => Err(ModelError::UnknownModel(other.to_string())),
    }
}

/// Read an integer parameter from the descriptor's JSON, with a default
/// for absent keys.
fn param_usize(
    descriptor: &ModelDescriptor,
    key: &str,
    default: usize,
    id: &'static str,
) -> Result<usize, ModelError> {
    let Some(params) = &descriptor.params else {
        return Ok(default);
    };
    match params.get(key) {
        None => Ok(default),
        Some(value) => match value.as_u64() {
            Some(n) => Ok(n as usize),
            None => Err(ModelError::InvalidParams {
                id,
                reason: format!("'{key}' must be a non-negative integer, got {value}"),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_candidate_is_buildable() {
        for descriptor in primary_candidates() {
            assert!(build_forecaster(&descriptor).is_ok(), "{}", descriptor.id);
        }
        for descriptor in secondary_candidates() {
            assert!(build_combiner(&descriptor).is_ok(), "{}", descriptor.id);
        }
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let descriptor = ModelDescriptor::named("ridge");
        assert!(matches!(
            build_forecaster(&descriptor),
            Err(ModelError::UnknownModel(id)) if id == "ridge"
        ));
        assert!(matches!(
            build_combiner(&descriptor),
            Err(ModelError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_params_reach_the_model() {
        let descriptor =
            ModelDescriptor::named(POLYFIT).with_params(serde_json::json!({ "degree": 1 }));
        let mut model = build_forecaster(&descriptor).unwrap();

        // Degree 1 needs two points; the default degree 2 would reject this.
        assert!(model.fit(&[1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_bad_params_are_rejected() {
        let descriptor =
            ModelDescriptor::named(POLYFIT).with_params(serde_json::json!({ "degree": "two" }));
        assert!(matches!(
            build_forecaster(&descriptor),
            Err(ModelError::InvalidParams { .. })
        ));

        let negative = ModelDescriptor::named(MOVING_AVERAGE)
            .with_params(serde_json::json!({ "window": -3 }));
        assert!(matches!(
            build_forecaster(&negative),
            Err(ModelError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_unrelated_params_are_ignored() {
        let descriptor =
            ModelDescriptor::named(NAIVE_DRIFT).with_params(serde_json::json!({ "degree": 9 }));
        assert!(build_forecaster(&descriptor).is_ok());
    }
}
