//! Reliability weight composition
//!
//! Statistics functions take weights as an optional, plain slice. This
//! module builds those slices from the quality ratings experts attach to
//! their answers, filling in a neutral default where a rating is missing.

use crate::fields::Parameter;
use crate::records::{CascadeAnalysis, DirectAnalysis};
use crate::scenario::Scenario;

/// Weight given to an answer without a quality rating (middle of 1..5)
pub const DEFAULT_QUALITY: f64 = 2.5;

/// Weights for a list of direct analyses, one per expert
pub fn direct_quality_weights(
    analyses: &[DirectAnalysis],
    scenario: Scenario,
    parameter: Parameter,
    default_quality: f64,
) -> Vec<f64> {
    let key = parameter.quality_key(scenario);
    analyses
        .iter()
        .map(|a| a.quality.get(&key).copied().flatten().unwrap_or(default_quality))
        .collect()
}

/// Weights for a list of cascade analyses, one per expert
pub fn cascade_quality_weights(analyses: &[CascadeAnalysis], default_quality: f64) -> Vec<f64> {
    analyses
        .iter()
        .map(|a| a.quality.unwrap_or(default_quality))
        .collect()
}
