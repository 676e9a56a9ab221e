//! Weighted statistics over expert estimates
//!
//! Global invariants enforced:
//! - Unanswered values never take part in an aggregate
//! - An aggregate over no answers is `None`, never zero
//! - Published figures are rounded to one decimal
//!
//! The standard deviation weights squared deviations by `w²` while the mean
//! weights by `w`.

use crate::error::{Error, Result};
use crate::scale::{extract_common_prefix, format_scale, parse_scale};
use serde::{Deserialize, Serialize};

/// Summary statistics of one field across experts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Stats {
    pub min: f64,
    pub min_label: String,
    pub max: f64,
    pub max_label: String,
    pub avg: f64,
    pub avg_label: String,
    pub std: f64,
}

/// Round to one decimal place
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to two decimal places
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Resolve the effective weights for `len` samples
///
/// Missing weights mean uniform. A weight vector with a negative or
/// non-finite entry, or a non-positive sum, is replaced by uniform weights.
fn effective_weights(len: usize, weights: Option<&[f64]>) -> Result<Vec<f64>> {
    match weights {
        None => Ok(vec![1.0; len]),
        Some(w) if w.len() != len => Err(Error::LengthMismatch {
            values: len,
            weights: w.len(),
        }),
        Some(w) => {
            let total: f64 = w.iter().sum();
            let in_range = w.iter().all(|x| x.is_finite() && *x >= 0.0);
            if in_range && total > 0.0 {
                Ok(w.to_vec())
            } else {
                tracing::warn!(
                    samples = len,
                    weight_sum = total,
                    "weights are negative, non-finite or sum to zero, using uniform weights"
                );
                Ok(vec![1.0; len])
            }
        }
    }
}

fn raw_mean(xs: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    xs.iter().zip(weights).map(|(x, w)| x * w).sum::<f64>() / total
}

fn raw_std_dev(xs: &[f64], weights: &[f64]) -> f64 {
    let mean = raw_mean(xs, weights);
    let total: f64 = weights.iter().sum();
    let variance = xs
        .iter()
        .zip(weights)
        .map(|(x, w)| w * w * (x - mean) * (x - mean))
        .sum::<f64>()
        / total;
    variance.sqrt()
}

/// Weighted arithmetic mean, rounded to one decimal
///
/// Returns 0 for an empty sequence.
pub fn weighted_mean(xs: &[f64], weights: Option<&[f64]>) -> Result<f64> {
    let weights = effective_weights(xs.len(), weights)?;
    if xs.is_empty() {
        return Ok(0.0);
    }
    Ok(round1(raw_mean(xs, &weights)))
}

/// Weighted population standard deviation, rounded to one decimal
///
/// Variance = Σ w²·(x − mean)² / Σ w, around the unrounded weighted mean.
/// Returns 0 for an empty sequence.
pub fn weighted_std_dev(xs: &[f64], weights: Option<&[f64]>) -> Result<f64> {
    let weights = effective_weights(xs.len(), weights)?;
    if xs.is_empty() {
        return Ok(0.0);
    }
    Ok(round1(raw_std_dev(xs, &weights)))
}

/// Numeric statistics without labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub std: f64,
}

/// Statistics over already-decoded values
///
/// `weights`, when given, is aligned with `values` (including the
/// unanswered positions, whose weights are dropped with them).
pub fn stats_of_numbers(
    values: &[Option<f64>],
    weights: Option<&[f64]>,
) -> Result<Option<NumericStats>> {
    if let Some(w) = weights {
        if w.len() != values.len() {
            return Err(Error::LengthMismatch {
                values: values.len(),
                weights: w.len(),
            });
        }
    }

    let mut xs = Vec::with_capacity(values.len());
    let mut ws = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        if let Some(x) = value {
            xs.push(*x);
            ws.push(weights.map_or(1.0, |w| w[i]));
        }
    }

    if xs.is_empty() {
        return Ok(None);
    }

    let ws = effective_weights(xs.len(), Some(&ws))?;
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(Some(NumericStats {
        min,
        max,
        avg: round1(raw_mean(&xs, &ws)),
        std: round1(raw_std_dev(&xs, &ws)),
    }))
}

/// Statistics over encoded scale values
///
/// Labels re-attach the prefix of the first answered value to min, max
/// and mean. Mixing prefixes in one call yields meaningless labels.
pub fn stats_of<S: AsRef<str>>(
    values: &[Option<S>],
    weights: Option<&[f64]>,
) -> Result<Option<Stats>> {
    let decoded = values
        .iter()
        .map(|v| {
            v.as_ref()
                .map(|s| parse_scale(s.as_ref()).map(|scale| scale.value))
                .transpose()
        })
        .collect::<Result<Vec<Option<f64>>>>()?;

    let Some(numeric) = stats_of_numbers(&decoded, weights)? else {
        return Ok(None);
    };
    let prefix = extract_common_prefix(values).unwrap_or_default();

    Ok(Some(Stats {
        min: numeric.min,
        min_label: format_scale(&prefix, numeric.min),
        max: numeric.max,
        max_label: format_scale(&prefix, numeric.max),
        avg: numeric.avg,
        avg_label: format_scale(&prefix, numeric.avg),
        std: numeric.std,
    }))
}

/// Labelled weighted mean of encoded scale values
pub fn average_of<S: AsRef<str>>(
    values: &[Option<S>],
    weights: Option<&[f64]>,
) -> Result<Option<String>> {
    Ok(stats_of(values, weights)?.map(|s| s.avg_label))
}
