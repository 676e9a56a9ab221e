//! BNRA core library - divergence and consensus statistics over expert estimates

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Every operation is a pure function of its inputs
// - No global mutable state
// - No I/O outside the config loader, no clocks, no randomness
// - Unanswered values never contribute to an aggregate
// - Identical input yields byte-for-byte identical output

pub mod analysis;
pub mod cascade;
pub mod config;
pub mod consensus;
pub mod divergence;
pub mod error;
pub mod fields;
pub mod records;
pub mod report;
pub mod scale;
pub mod scenario;
pub mod stats;
pub mod weights;

pub use cascade::{cascade_analysis_to_input, cascade_field_for, CascadeAnalysisInput, CascadeField};
pub use config::ResolvedConfig;
pub use consensus::{build_consensus_cascade, ConsensusCascadeAnalysis};
pub use divergence::{cascade_divergence, parameter_divergence, DivergenceBand, DivergenceThresholds};
pub use error::{Error, Result};
pub use fields::{qualitative_field_for, quantitative_fields_for, sections_for, Parameter, Section};
pub use records::{CascadeAnalysis, CascadeLink, DirectAnalysis, RiskFile, RiskFileExport};
pub use report::{render_json, render_text, sort_reports, RiskFileReport};
pub use scale::{extract_common_prefix, format_scale, parse_scale, Scale};
pub use scenario::{RiskTypeCategory, Scenario};
pub use stats::{average_of, stats_of, weighted_mean, weighted_std_dev, Stats};

/// Knobs for building discussion reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub thresholds: DivergenceThresholds,
    /// Weight of answers without a quality rating
    pub default_quality: f64,
    /// Lowest band kept in reports
    pub min_band: DivergenceBand,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            thresholds: DivergenceThresholds::default(),
            default_quality: weights::DEFAULT_QUALITY,
            min_band: DivergenceBand::Low,
        }
    }
}

impl From<&ResolvedConfig> for AnalysisOptions {
    fn from(config: &ResolvedConfig) -> Self {
        AnalysisOptions {
            thresholds: config.thresholds,
            default_quality: config.default_quality,
            min_band: config.min_band,
        }
    }
}

/// Build the discussion report of every risk file in an export
///
/// Reports come back sorted: most divergent first, then by title.
pub fn analyze(export: &RiskFileExport, options: &AnalysisOptions) -> Result<Vec<RiskFileReport>> {
    let reports = export
        .risk_files
        .iter()
        .map(|rf| analysis::analyze_risk_file(rf, options))
        .collect::<Result<Vec<_>>>()?;

    Ok(sort_reports(reports))
}
