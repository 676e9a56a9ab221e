//! Cascade cell resolution
//!
//! A cascade estimate is a 3×3 matrix of conditional probabilities: the
//! chance that a cause scenario triggers an effect scenario. Each cell lives
//! in its own backend column named `<cause letter>2<effect letter>`.

use crate::error::Result;
use crate::records::CascadeAnalysis;
use crate::scale::parse_scale_int;
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};

/// Scale prefix of conditional probability values
pub const CP_PREFIX: &str = "CP";

/// Highest value on the conditional probability scale
pub const CP_MAX_SCALE: f64 = 6.0;

/// One cell of the cause/effect matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeField {
    C2c,
    C2m,
    C2e,
    M2c,
    M2m,
    M2e,
    E2c,
    E2m,
    E2e,
}

/// Cells indexed by [cause][effect]
const CASCADE_TABLE: [[CascadeField; 3]; 3] = [
    [CascadeField::C2c, CascadeField::C2m, CascadeField::C2e],
    [CascadeField::M2c, CascadeField::M2m, CascadeField::M2e],
    [CascadeField::E2c, CascadeField::E2m, CascadeField::E2e],
];

impl CascadeField {
    /// Every cell, cause-major
    pub const ALL: [CascadeField; 9] = [
        CascadeField::C2c,
        CascadeField::C2m,
        CascadeField::C2e,
        CascadeField::M2c,
        CascadeField::M2m,
        CascadeField::M2e,
        CascadeField::E2c,
        CascadeField::E2m,
        CascadeField::E2e,
    ];

    /// Backend column name
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeField::C2c => "cr4de_c2c",
            CascadeField::C2m => "cr4de_c2m",
            CascadeField::C2e => "cr4de_c2e",
            CascadeField::M2c => "cr4de_m2c",
            CascadeField::M2m => "cr4de_m2m",
            CascadeField::M2e => "cr4de_m2e",
            CascadeField::E2c => "cr4de_e2c",
            CascadeField::E2m => "cr4de_e2m",
            CascadeField::E2e => "cr4de_e2e",
        }
    }

    /// Short name without the backend prefix (`c2m`)
    pub fn short_name(&self) -> &'static str {
        &self.as_str()["cr4de_".len()..]
    }

    pub fn cause(&self) -> Scenario {
        Scenario::ALL[self.position() / 3]
    }

    pub fn effect(&self) -> Scenario {
        Scenario::ALL[self.position() % 3]
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

/// Column holding the probability that `cause` triggers `effect`
pub fn cascade_field_for(cause: Scenario, effect: Scenario) -> CascadeField {
    CASCADE_TABLE[cause.index()][effect.index()]
}

/// Plain numeric projection of a cascade analysis
///
/// This is the shape the estimation sliders work with: bare integers, no
/// scale prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CascadeAnalysisInput {
    pub c2c: Option<u32>,
    pub c2m: Option<u32>,
    pub c2e: Option<u32>,
    pub m2c: Option<u32>,
    pub m2m: Option<u32>,
    pub m2e: Option<u32>,
    pub e2c: Option<u32>,
    pub e2m: Option<u32>,
    pub e2e: Option<u32>,
    pub quali: Option<String>,
}

impl CascadeAnalysisInput {
    pub fn cell(&self, field: CascadeField) -> Option<u32> {
        match field {
            CascadeField::C2c => self.c2c,
            CascadeField::C2m => self.c2m,
            CascadeField::C2e => self.c2e,
            CascadeField::M2c => self.m2c,
            CascadeField::M2m => self.m2m,
            CascadeField::M2e => self.m2e,
            CascadeField::E2c => self.e2c,
            CascadeField::E2m => self.e2m,
            CascadeField::E2e => self.e2e,
        }
    }
}

/// Project a cascade analysis onto its numeric input form
pub fn cascade_analysis_to_input(record: &CascadeAnalysis) -> Result<CascadeAnalysisInput> {
    let decode = |field: CascadeField| record.cell(field).map(parse_scale_int).transpose();

    Ok(CascadeAnalysisInput {
        c2c: decode(CascadeField::C2c)?,
        c2m: decode(CascadeField::C2m)?,
        c2e: decode(CascadeField::C2e)?,
        m2c: decode(CascadeField::M2c)?,
        m2m: decode(CascadeField::M2m)?,
        m2e: decode(CascadeField::M2e)?,
        e2c: decode(CascadeField::E2c)?,
        e2m: decode(CascadeField::E2m)?,
        e2e: decode(CascadeField::E2e)?,
        quali: record.quali.clone(),
    })
}
