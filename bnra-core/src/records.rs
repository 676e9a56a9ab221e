//! Backend records consumed by the engine
//!
//! Records arrive already fetched and deserialized from the OData backend.
//! Column names keep the backend's `cr4de_` prefix so exports can be fed in
//! unchanged.

use crate::cascade::CascadeField;
use crate::scenario::RiskTypeCategory;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One expert's direct analysis of a risk file
///
/// The per-scenario answers are kept as the flat column map the backend
/// returns, since which columns exist depends on the risk type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectAnalysis {
    #[serde(rename = "cr4de_bnradirectanalysisid", default)]
    pub id: Option<String>,

    #[serde(rename = "_cr4de_expert_value", default)]
    pub expert: Option<String>,

    /// Reliability ratings keyed by `<stem>_<scenarioLetter>`; unset
    /// ratings are `None`
    #[serde(rename = "cr4de_quality", default, deserialize_with = "null_as_empty")]
    pub quality: BTreeMap<String, Option<f64>>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl DirectAnalysis {
    /// String value of a column; anything but a string counts as unanswered
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// Builder used by tests and fixtures
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(
            name.to_string(),
            serde_json::Value::String(value.to_string()),
        );
        self
    }

    pub fn with_quality(mut self, key: &str, quality: f64) -> Self {
        self.quality.insert(key.to_string(), Some(quality));
        self
    }
}

/// One expert's estimate of a cascade link
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CascadeAnalysis {
    #[serde(rename = "cr4de_bnracascadeanalysisid", default)]
    pub id: Option<String>,

    #[serde(rename = "_cr4de_expert_value", default)]
    pub expert: Option<String>,

    #[serde(rename = "_cr4de_cascade_value", default)]
    pub cascade: Option<String>,

    #[serde(rename = "cr4de_c2c", default)]
    pub c2c: Option<String>,
    #[serde(rename = "cr4de_c2m", default)]
    pub c2m: Option<String>,
    #[serde(rename = "cr4de_c2e", default)]
    pub c2e: Option<String>,
    #[serde(rename = "cr4de_m2c", default)]
    pub m2c: Option<String>,
    #[serde(rename = "cr4de_m2m", default)]
    pub m2m: Option<String>,
    #[serde(rename = "cr4de_m2e", default)]
    pub m2e: Option<String>,
    #[serde(rename = "cr4de_e2c", default)]
    pub e2c: Option<String>,
    #[serde(rename = "cr4de_e2m", default)]
    pub e2m: Option<String>,
    #[serde(rename = "cr4de_e2e", default)]
    pub e2e: Option<String>,

    /// Narrative justification of the estimates
    #[serde(rename = "cr4de_quali", default)]
    pub quali: Option<String>,

    /// Self-assessed quality of the estimate, 1 to 5
    #[serde(rename = "cr4de_quality", default)]
    pub quality: Option<f64>,
}

impl CascadeAnalysis {
    /// Encoded value of one cell of the cause/effect matrix
    pub fn cell(&self, field: CascadeField) -> Option<&str> {
        let value = match field {
            CascadeField::C2c => &self.c2c,
            CascadeField::C2m => &self.c2m,
            CascadeField::C2e => &self.c2e,
            CascadeField::M2c => &self.m2c,
            CascadeField::M2m => &self.m2m,
            CascadeField::M2e => &self.m2e,
            CascadeField::E2c => &self.e2c,
            CascadeField::E2m => &self.e2m,
            CascadeField::E2e => &self.e2e,
        };
        value.as_deref()
    }

    pub fn set_cell(&mut self, field: CascadeField, value: Option<String>) {
        let slot = match field {
            CascadeField::C2c => &mut self.c2c,
            CascadeField::C2m => &mut self.c2m,
            CascadeField::C2e => &mut self.c2e,
            CascadeField::M2c => &mut self.m2c,
            CascadeField::M2m => &mut self.m2m,
            CascadeField::M2e => &mut self.m2e,
            CascadeField::E2c => &mut self.e2c,
            CascadeField::E2m => &mut self.e2m,
            CascadeField::E2e => &mut self.e2e,
        };
        *slot = value;
    }

    /// Builder used by tests and fixtures
    pub fn with_cell(mut self, field: CascadeField, value: &str) -> Self {
        self.set_cell(field, Some(value.to_string()));
        self
    }
}

/// A cascade link together with every expert's estimate of it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CascadeLink {
    pub id: String,
    /// Title of the cause risk file
    pub cause: String,
    /// Title of the effect risk file
    pub effect: String,
    #[serde(default = "default_risk_type")]
    pub cause_type: RiskTypeCategory,
    #[serde(default = "default_risk_type")]
    pub effect_type: RiskTypeCategory,
    #[serde(default)]
    pub analyses: Vec<CascadeAnalysis>,
}

/// A risk file with its direct analyses and outgoing/incoming cascades
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFile {
    pub id: String,
    pub title: String,
    #[serde(default = "default_risk_type")]
    pub risk_type: RiskTypeCategory,
    #[serde(default)]
    pub direct_analyses: Vec<DirectAnalysis>,
    #[serde(default)]
    pub cascades: Vec<CascadeLink>,
}

/// Export of the backend consumed by the command line tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RiskFileExport {
    #[serde(default)]
    pub risk_files: Vec<RiskFile>,
}

fn default_risk_type() -> RiskTypeCategory {
    RiskTypeCategory::Standard
}

/// The backend writes `null` for a column nobody filled in
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
