//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::divergence::DivergenceBand;
use crate::fields::Parameter;
use crate::scenario::{CascadeKind, RiskTypeCategory, Scenario};
use crate::stats::Stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics of one quantitative field across experts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FieldReport {
    pub field: String,
    pub respondents: usize,
    /// Quality-weighted statistics; absent when nobody answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
}

/// Divergence of one section for one scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SectionReport {
    pub parameter: Parameter,
    pub label: String,
    pub scenario: Scenario,
    pub divergence: f64,
    pub band: DivergenceBand,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<FieldReport>,
}

/// Divergence and consensus of one cascade link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CascadeReport {
    pub id: String,
    pub cause: String,
    pub effect: String,
    pub kind: CascadeKind,
    pub respondents: usize,
    pub divergence: f64,
    pub band: DivergenceBand,
    /// Consensus value per cell, keyed by short cell name (`c2m`)
    pub consensus: BTreeMap<String, Option<String>>,
}

/// Discussion report for one risk file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RiskFileReport {
    pub id: String,
    pub title: String,
    pub risk_type: RiskTypeCategory,
    pub experts: usize,
    /// Highest band among sections and cascades (low when there are none)
    pub band: DivergenceBand,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sections: Vec<SectionReport>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cascades: Vec<CascadeReport>,
}

impl RiskFileReport {
    /// Sections and cascades that need discussion at `band` or above
    pub fn needs_discussion(&self, band: DivergenceBand) -> usize {
        self.sections.iter().filter(|s| s.band >= band).count()
            + self.cascades.iter().filter(|c| c.band >= band).count()
    }
}

/// Sort reports deterministically
pub fn sort_reports(mut reports: Vec<RiskFileReport>) -> Vec<RiskFileReport> {
    reports.sort_by(|a, b| {
        // 1. Band descending
        b.band
            .cmp(&a.band)
            // 2. Title ascending
            .then_with(|| a.title.cmp(&b.title))
            // 3. Id ascending
            .then_with(|| a.id.cmp(&b.id))
    });
    reports
}

/// Render reports as text output
pub fn render_text(reports: &[RiskFileReport]) -> String {
    let mut output = String::new();

    for report in reports {
        output.push_str(&format!(
            "{} [{}] {} expert(s), band {}\n",
            report.title,
            report.risk_type.as_str(),
            report.experts,
            report.band.as_str()
        ));

        if !report.sections.is_empty() {
            output.push_str(&format!(
                "  {:<28} {:<13} {:<11} {}\n",
                "SECTION", "SCENARIO", "DIVERGENCE", "BAND"
            ));
            for section in &report.sections {
                output.push_str(&format!(
                    "  {:<28} {:<13} {:<11.2} {}\n",
                    truncate_or_pad(&section.label, 28),
                    section.scenario.as_str(),
                    section.divergence,
                    section.band.as_str()
                ));
                for field in &section.fields {
                    let summary = match &field.stats {
                        Some(s) => format!(
                            "avg {} (min {}, max {}, std {})",
                            s.avg_label, s.min_label, s.max_label, s.std
                        ),
                        None => "-".to_string(),
                    };
                    output.push_str(&format!(
                        "      {:<26} n={:<3} {}\n",
                        field.field, field.respondents, summary
                    ));
                }
            }
        }

        if !report.cascades.is_empty() {
            output.push_str(&format!(
                "  {:<40} {:<11} {:<11} {}\n",
                "CASCADE", "KIND", "DIVERGENCE", "BAND"
            ));
            for cascade in &report.cascades {
                let link = format!("{} -> {}", cascade.cause, cascade.effect);
                output.push_str(&format!(
                    "  {:<40} {:<11} {:<11.2} {}\n",
                    truncate_or_pad(&link, 40),
                    cascade.kind.as_str(),
                    cascade.divergence,
                    cascade.band.as_str()
                ));
                output.push_str(&format!("      consensus {}\n", render_cells(&cascade.consensus)));
            }
        }

        output.push('\n');
    }

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[RiskFileReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

/// Render consensus cells as `c2c=CP2 c2m=- ...`
pub fn render_cells(cells: &BTreeMap<String, Option<String>>) -> String {
    cells
        .iter()
        .map(|(name, value)| format!("{}={}", name, value.as_deref().unwrap_or("-")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
