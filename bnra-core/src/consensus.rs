//! Consensus cascade synthesis
//!
//! Collapses every expert's estimate of a cascade link into one record of
//! the same shape. Only the numeric cells are aggregated; the narrative is
//! written by the analysts during the consensus round.

use crate::cascade::{CascadeField, CP_PREFIX};
use crate::error::Result;
use crate::records::CascadeAnalysis;
use crate::scale::{format_scale, parse_scale};
use crate::stats::stats_of_numbers;
use crate::weights::cascade_quality_weights;

/// A synthesized cascade estimate; same columns as an expert's record
pub type ConsensusCascadeAnalysis = CascadeAnalysis;

/// Snap a mean onto the half-step grid of the scale
pub fn snap_to_half_step(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

fn consensus_cell(
    analyses: &[CascadeAnalysis],
    field: CascadeField,
    weights: Option<&[f64]>,
) -> Result<Option<String>> {
    let values = analyses
        .iter()
        .map(|a| a.cell(field).map(|v| parse_scale(v).map(|s| s.value)).transpose())
        .collect::<Result<Vec<Option<f64>>>>()?;

    Ok(stats_of_numbers(&values, weights)?
        .map(|stats| format_scale(CP_PREFIX, snap_to_half_step(stats.avg))))
}

fn build(analyses: &[CascadeAnalysis], weights: Option<&[f64]>) -> Result<ConsensusCascadeAnalysis> {
    let mut consensus = ConsensusCascadeAnalysis {
        cascade: analyses.iter().find_map(|a| a.cascade.clone()),
        ..Default::default()
    };

    for field in CascadeField::ALL {
        consensus.set_cell(field, consensus_cell(analyses, field, weights)?);
    }

    Ok(consensus)
}

/// Unweighted consensus of a set of expert cascade analyses
///
/// Cells no expert answered stay empty.
pub fn build_consensus_cascade(analyses: &[CascadeAnalysis]) -> Result<ConsensusCascadeAnalysis> {
    build(analyses, None)
}

/// Consensus weighted by each expert's quality rating
pub fn build_weighted_consensus_cascade(
    analyses: &[CascadeAnalysis],
    default_quality: f64,
) -> Result<ConsensusCascadeAnalysis> {
    let weights = cascade_quality_weights(analyses, default_quality);
    build(analyses, Some(&weights))
}
