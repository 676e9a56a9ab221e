//! Analysis orchestration - ties together field resolution, statistics,
//! divergence scoring, consensus and reporting for one risk file

use crate::cascade::CascadeField;
use crate::consensus::build_weighted_consensus_cascade;
use crate::divergence::{
    assign_band_with_thresholds, cascade_divergence, parameter_divergence, DivergenceBand,
};
use crate::error::Result;
use crate::fields::{quantitative_fields_for, sections_for, Section};
use crate::records::{CascadeLink, DirectAnalysis, RiskFile};
use crate::report::{CascadeReport, FieldReport, RiskFileReport, SectionReport};
use crate::scenario::{CascadeKind, Scenario};
use crate::stats::stats_of;
use crate::weights::direct_quality_weights;
use crate::AnalysisOptions;

/// Quality-weighted statistics of every quantitative field of a section
pub fn field_reports(
    analyses: &[DirectAnalysis],
    scenario: Scenario,
    section: &Section,
    default_quality: f64,
) -> Result<Vec<FieldReport>> {
    let weights = direct_quality_weights(analyses, scenario, section.parameter, default_quality);

    quantitative_fields_for(scenario, section.parameter)
        .into_iter()
        .map(|field| {
            let values: Vec<Option<&str>> = analyses.iter().map(|a| a.field(field)).collect();
            Ok(FieldReport {
                field: field.to_string(),
                respondents: values.iter().flatten().count(),
                stats: stats_of(&values, Some(&weights))?,
            })
        })
        .collect()
}

/// Report one section for one scenario
pub fn analyze_section(
    analyses: &[DirectAnalysis],
    scenario: Scenario,
    section: &Section,
    options: &AnalysisOptions,
) -> Result<SectionReport> {
    let divergence = parameter_divergence(analyses, scenario, section)?;

    Ok(SectionReport {
        parameter: section.parameter,
        label: section.label.to_string(),
        scenario,
        divergence,
        band: assign_band_with_thresholds(divergence, &options.thresholds),
        fields: field_reports(analyses, scenario, section, options.default_quality)?,
    })
}

/// Report one cascade link
pub fn analyze_cascade(link: &CascadeLink, options: &AnalysisOptions) -> Result<CascadeReport> {
    let divergence = cascade_divergence(&link.analyses)?;
    let consensus = build_weighted_consensus_cascade(&link.analyses, options.default_quality)?;

    Ok(CascadeReport {
        id: link.id.clone(),
        cause: link.cause.clone(),
        effect: link.effect.clone(),
        kind: CascadeKind::classify(link.cause_type),
        respondents: link.analyses.len(),
        divergence,
        band: assign_band_with_thresholds(divergence, &options.thresholds),
        consensus: CascadeField::ALL
            .iter()
            .map(|f| (f.short_name().to_string(), consensus.cell(*f).map(str::to_string)))
            .collect(),
    })
}

/// Report a whole risk file
///
/// Sections are listed in section order, then by scenario; cascades in
/// input order. Entries below `options.min_band` are dropped, but the
/// overall band is computed before filtering.
pub fn analyze_risk_file(risk_file: &RiskFile, options: &AnalysisOptions) -> Result<RiskFileReport> {
    let _span = tracing::debug_span!("risk_file", id = %risk_file.id).entered();

    let mut sections = Vec::new();
    for section in sections_for(risk_file.risk_type) {
        for scenario in Scenario::ALL {
            sections.push(analyze_section(
                &risk_file.direct_analyses,
                scenario,
                &section,
                options,
            )?);
        }
    }

    let cascades = risk_file
        .cascades
        .iter()
        .map(|link| analyze_cascade(link, options))
        .collect::<Result<Vec<_>>>()?;

    let band = sections
        .iter()
        .map(|s| s.band)
        .chain(cascades.iter().map(|c| c.band))
        .max()
        .unwrap_or(DivergenceBand::Low);

    tracing::debug!(
        sections = sections.len(),
        cascades = cascades.len(),
        band = band.as_str(),
        "risk file analyzed"
    );

    Ok(RiskFileReport {
        id: risk_file.id.clone(),
        title: risk_file.title.clone(),
        risk_type: risk_file.risk_type,
        experts: risk_file.direct_analyses.len(),
        band,
        sections: sections
            .into_iter()
            .filter(|s| s.band >= options.min_band)
            .collect(),
        cascades: cascades
            .into_iter()
            .filter(|c| c.band >= options.min_band)
            .collect(),
    })
}
