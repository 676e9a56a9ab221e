//! Expert divergence scoring
//!
//! Divergence is the mean standard deviation of the experts' answers,
//! normalized by the scale's maximum, and decides whether a section needs
//! to be discussed in the consensus round.
//!
//! Global invariants enforced:
//! - Fields nobody answered are left out of the mean, not counted as zero
//! - Empty input yields zero divergence instead of an error
//! - Scores are rounded to two decimals

use crate::cascade::{cascade_analysis_to_input, CascadeField, CP_MAX_SCALE};
use crate::error::Result;
use crate::fields::{quantitative_fields_for, Section};
use crate::records::{CascadeAnalysis, DirectAnalysis};
use crate::scenario::Scenario;
use crate::stats::{round2, stats_of, stats_of_numbers};
use serde::{Deserialize, Serialize};

/// Discussion urgency derived from a divergence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceBand {
    Low,    // < 0.2
    Medium, // 0.2-0.4
    High,   // >= 0.4
}

impl DivergenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            DivergenceBand::Low => "low",
            DivergenceBand::Medium => "medium",
            DivergenceBand::High => "high",
        }
    }
}

/// Configurable divergence band thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for DivergenceThresholds {
    fn default() -> Self {
        DivergenceThresholds {
            medium: 0.2,
            high: 0.4,
        }
    }
}

/// Assign a band with default thresholds
pub fn assign_band(divergence: f64) -> DivergenceBand {
    assign_band_with_thresholds(divergence, &DivergenceThresholds::default())
}

/// Assign a band with custom thresholds
pub fn assign_band_with_thresholds(
    divergence: f64,
    thresholds: &DivergenceThresholds,
) -> DivergenceBand {
    if divergence < thresholds.medium {
        DivergenceBand::Low
    } else if divergence < thresholds.high {
        DivergenceBand::Medium
    } else {
        DivergenceBand::High
    }
}

fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Divergence of one section for one scenario
pub fn parameter_divergence(
    analyses: &[DirectAnalysis],
    scenario: Scenario,
    section: &Section,
) -> Result<f64> {
    let mut deviations = Vec::new();

    for field in quantitative_fields_for(scenario, section.parameter) {
        let values: Vec<Option<&str>> = analyses.iter().map(|a| a.field(field)).collect();
        if let Some(stats) = stats_of(&values, None)? {
            tracing::debug!(field, std = stats.std, "field deviation");
            deviations.push(stats.std);
        }
    }

    Ok(round2(mean_or_zero(&deviations) / section.max_scale))
}

/// Divergence of the 9 cells of a cascade link
pub fn cascade_divergence(analyses: &[CascadeAnalysis]) -> Result<f64> {
    let inputs = analyses
        .iter()
        .map(cascade_analysis_to_input)
        .collect::<Result<Vec<_>>>()?;

    let mut deviations = Vec::new();
    for field in CascadeField::ALL {
        let values: Vec<Option<f64>> = inputs
            .iter()
            .map(|input| input.cell(field).map(f64::from))
            .collect();
        if let Some(stats) = stats_of_numbers(&values, None)? {
            tracing::debug!(cell = field.short_name(), std = stats.std, "cell deviation");
            deviations.push(stats.std);
        }
    }

    Ok(round2(mean_or_zero(&deviations) / CP_MAX_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Parameter;

    fn expert_dp(value: &str) -> DirectAnalysis {
        DirectAnalysis::default().with_field("cr4de_dp_quanti_c", value)
    }

    fn cascade(c2c: &str) -> CascadeAnalysis {
        CascadeAnalysis::default().with_cell(CascadeField::C2c, c2c)
    }

    #[test]
    fn test_bands() {
        assert_eq!(assign_band(0.0), DivergenceBand::Low);
        assert_eq!(assign_band(0.19), DivergenceBand::Low);
        assert_eq!(assign_band(0.2), DivergenceBand::Medium);
        assert_eq!(assign_band(0.39), DivergenceBand::Medium);
        assert_eq!(assign_band(0.4), DivergenceBand::High);
        assert_eq!(assign_band(1.2), DivergenceBand::High);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = DivergenceThresholds {
            medium: 0.1,
            high: 0.3,
        };
        assert_eq!(
            assign_band_with_thresholds(0.15, &thresholds),
            DivergenceBand::Medium
        );
    }

    #[test]
    fn test_unanimous_experts_have_zero_divergence() {
        let analyses = vec![expert_dp("DP3"), expert_dp("DP3"), expert_dp("DP3")];
        let section = Section::new(Parameter::Dp);
        assert_eq!(
            parameter_divergence(&analyses, Scenario::Considerable, &section).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_outlier_increases_divergence() {
        let section = Section::new(Parameter::Dp);
        let agreeing = vec![expert_dp("DP2"), expert_dp("DP2"), expert_dp("DP2")];
        let outlier = vec![expert_dp("DP2"), expert_dp("DP2"), expert_dp("DP5")];

        let base = parameter_divergence(&agreeing, Scenario::Considerable, &section).unwrap();
        let spread = parameter_divergence(&outlier, Scenario::Considerable, &section).unwrap();
        assert!(spread > base);
        // std of [2,2,5] = 1.41 -> 1.4, / 5 = 0.28
        assert_eq!(spread, 0.28);
    }

    #[test]
    fn test_other_scenarios_are_ignored() {
        let analyses = vec![expert_dp("DP0"), expert_dp("DP5")];
        let section = Section::new(Parameter::Dp);
        assert_eq!(
            parameter_divergence(&analyses, Scenario::Major, &section).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_unanswered_subfields_are_skipped() {
        // Ha: [1, 3] -> std 1.0, Hb: [2, 2] -> std 0.0, Hc: never answered
        let analyses = vec![
            DirectAnalysis::default()
                .with_field("cr4de_di_quanti_ha_m", "Ha1")
                .with_field("cr4de_di_quanti_hb_m", "Hb2"),
            DirectAnalysis::default()
                .with_field("cr4de_di_quanti_ha_m", "Ha3")
                .with_field("cr4de_di_quanti_hb_m", "Hb2"),
        ];
        let section = Section::new(Parameter::H);
        // mean(1.0, 0.0) / 6 = 0.083 -> 0.08; counting Hc as 0 would give 0.06
        assert_eq!(
            parameter_divergence(&analyses, Scenario::Major, &section).unwrap(),
            0.08
        );
    }

    #[test]
    fn test_cross_border_has_no_divergence() {
        let analyses = vec![expert_dp("DP1"), expert_dp("DP5")];
        let section = Section::new(Parameter::Cb);
        assert_eq!(
            parameter_divergence(&analyses, Scenario::Considerable, &section).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_empty_inputs() {
        let section = Section::new(Parameter::S);
        assert_eq!(
            parameter_divergence(&[], Scenario::Extreme, &section).unwrap(),
            0.0
        );
        assert_eq!(cascade_divergence(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_cascade_divergence_single_cell() {
        // std of [1, 2, 3] = 0.8, / 6 = 0.133 -> 0.13
        let analyses = vec![cascade("CP1"), cascade("CP2"), cascade("CP3")];
        assert_eq!(cascade_divergence(&analyses).unwrap(), 0.13);
    }

    #[test]
    fn test_cascade_divergence_averages_answered_cells() {
        let analyses = vec![
            cascade("CP0").with_cell(CascadeField::E2e, "CP4"),
            cascade("CP6").with_cell(CascadeField::E2e, "CP4"),
        ];
        // c2c std 3.0, e2e std 0.0 -> mean 1.5 / 6 = 0.25
        assert_eq!(cascade_divergence(&analyses).unwrap(), 0.25);
    }

    #[test]
    fn test_malformed_values_propagate() {
        let analyses = vec![expert_dp("DP3"), expert_dp("three")];
        let section = Section::new(Parameter::Dp);
        assert!(parameter_divergence(&analyses, Scenario::Considerable, &section).is_err());
    }
}
