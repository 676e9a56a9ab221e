//! Parameter and field resolution
//!
//! Maps (scenario, parameter) pairs onto the backend field names that hold
//! each expert's answers. Everything here is table lookup: no iteration over
//! expert data happens in this module.

use crate::scenario::{RiskTypeCategory, Scenario};
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};

/// Field name prefix shared by every backend column
pub const FIELD_PREFIX: &str = "cr4de_";

/// Analysis parameter of a risk file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// Direct probability
    Dp,
    /// Direct probability projected to 2050
    Dp2050,
    /// Human impact
    H,
    /// Societal impact
    S,
    /// Environmental impact
    E,
    /// Financial impact
    F,
    /// Cross-border effects
    Cb,
}

/// Sub-dimension letters of each impact parameter
///
/// H: fatalities, injured, evacuated. S: supply, public order, reputation,
/// confidence. E: environment. F: assets, economy.
const IMPACT_SUBDIMENSIONS: &[(Parameter, &[&str])] = &[
    (Parameter::H, &["a", "b", "c"]),
    (Parameter::S, &["a", "b", "c", "d"]),
    (Parameter::E, &["a"]),
    (Parameter::F, &["a", "b"]),
];

impl Parameter {
    pub const ALL: [Parameter; 7] = [
        Parameter::Dp,
        Parameter::Dp2050,
        Parameter::H,
        Parameter::S,
        Parameter::E,
        Parameter::F,
        Parameter::Cb,
    ];

    /// Stem used in backend field names and quality keys
    pub fn stem(&self) -> &'static str {
        match self {
            Parameter::Dp => "dp",
            Parameter::Dp2050 => "dp50",
            Parameter::H => "h",
            Parameter::S => "s",
            Parameter::E => "e",
            Parameter::F => "f",
            Parameter::Cb => "cb",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Dp => "Direct Probability",
            Parameter::Dp2050 => "Direct Probability (2050)",
            Parameter::H => "Human Impact",
            Parameter::S => "Societal Impact",
            Parameter::E => "Environmental Impact",
            Parameter::F => "Financial Impact",
            Parameter::Cb => "Cross-border Effects",
        }
    }

    /// Highest value on this parameter's scale
    ///
    /// Probability-like scales stop at 5, impact scales at 6. Cross-border
    /// effects have no quantitative part; they share the impact ceiling.
    pub fn max_scale(&self) -> f64 {
        match self {
            Parameter::Dp | Parameter::Dp2050 => 5.0,
            _ => 6.0,
        }
    }

    /// Key of this parameter/scenario pair in a quality map (`"h_m"`)
    pub fn quality_key(&self, scenario: Scenario) -> String {
        format!("{}_{}", self.stem(), scenario.letter())
    }
}

/// One analysis section of a risk file
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Section {
    pub parameter: Parameter,
    pub label: &'static str,
    pub max_scale: f64,
}

impl Section {
    pub fn new(parameter: Parameter) -> Self {
        Section {
            parameter,
            label: parameter.label(),
            max_scale: parameter.max_scale(),
        }
    }
}

/// Sections exposed by a risk type
///
/// Standard risks expose every parameter. Malicious actors expose a single
/// probability section relabelled as motivation. Emerging risks have none.
pub fn sections_for(risk_type: RiskTypeCategory) -> Vec<Section> {
    match risk_type {
        RiskTypeCategory::Standard => Parameter::ALL.iter().copied().map(Section::new).collect(),
        RiskTypeCategory::ManMade => vec![Section {
            parameter: Parameter::Dp,
            label: "Motivation",
            max_scale: Parameter::Dp.max_scale(),
        }],
        RiskTypeCategory::Emerging => Vec::new(),
    }
}

/// Field holding the expert's written justification
pub fn qualitative_field_for(scenario: Scenario, parameter: Parameter) -> String {
    let letter = scenario.letter();
    match parameter {
        Parameter::Dp | Parameter::Dp2050 => {
            format!("{}{}_quali_{}", FIELD_PREFIX, parameter.stem(), letter)
        }
        Parameter::Cb => format!("{}cross_border_impact_quali_{}", FIELD_PREFIX, letter),
        _ => format!("{}di_quali_{}_{}", FIELD_PREFIX, parameter.stem(), letter),
    }
}

/// Every quantitative field known to the backend schema
pub fn known_quantitative_fields() -> &'static [String] {
    static FIELDS: std::sync::OnceLock<Vec<String>> = std::sync::OnceLock::new();
    FIELDS.get_or_init(|| {
        let mut fields = Vec::new();
        for scenario in Scenario::ALL {
            let letter = scenario.letter();
            fields.push(format!("{}dp_quanti_{}", FIELD_PREFIX, letter));
            fields.push(format!("{}dp50_quanti_{}", FIELD_PREFIX, letter));
            for (parameter, subs) in IMPACT_SUBDIMENSIONS {
                for sub in *subs {
                    fields.push(format!(
                        "{}di_quanti_{}{}_{}",
                        FIELD_PREFIX,
                        parameter.stem(),
                        sub,
                        letter
                    ));
                }
            }
        }
        fields
    })
}

fn impact_matcher(scenario: Scenario, parameter: Parameter) -> GlobMatcher {
    // stem + one wildcard sub-letter + scenario letter
    let pattern = format!(
        "{}di_quanti_{}?_{}",
        FIELD_PREFIX,
        parameter.stem(),
        scenario.letter()
    );
    Glob::new(&pattern).unwrap().compile_matcher()
}

/// Fields holding the expert's quantitative estimates
///
/// Probabilities resolve to one field, cross-border effects to none, and
/// impacts to one field per sub-dimension.
pub fn quantitative_fields_for(scenario: Scenario, parameter: Parameter) -> Vec<&'static str> {
    let letter = scenario.letter();
    match parameter {
        Parameter::Dp | Parameter::Dp2050 => {
            let name = format!("{}{}_quanti_{}", FIELD_PREFIX, parameter.stem(), letter);
            known_quantitative_fields()
                .iter()
                .filter(|f| **f == name)
                .map(String::as_str)
                .collect()
        }
        Parameter::Cb => Vec::new(),
        _ => {
            let matcher = impact_matcher(scenario, parameter);
            known_quantitative_fields()
                .iter()
                .filter(|f| matcher.is_match(f.as_str()))
                .map(String::as_str)
                .collect()
        }
    }
}
