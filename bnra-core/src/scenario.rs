//! Intensity scenarios and risk type categories

use serde::{Deserialize, Serialize};

/// Intensity scenario of a risk occurrence, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Considerable,
    Major,
    Extreme,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Considerable, Scenario::Major, Scenario::Extreme];

    /// Letter used in backend field names
    pub fn letter(&self) -> &'static str {
        match self {
            Scenario::Considerable => "c",
            Scenario::Major => "m",
            Scenario::Extreme => "e",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Considerable => "considerable",
            Scenario::Major => "major",
            Scenario::Extreme => "extreme",
        }
    }

    /// Position on the severity axis (0..3), used to index lookup tables
    pub fn index(&self) -> usize {
        match self {
            Scenario::Considerable => 0,
            Scenario::Major => 1,
            Scenario::Extreme => 2,
        }
    }
}

/// Risk type classification of a risk file
///
/// Decides which analysis sections exist and how cascades are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTypeCategory {
    #[serde(alias = "standard", alias = "STANDARD")]
    Standard,
    #[serde(alias = "manmade", alias = "MANMADE", alias = "Malicious")]
    ManMade,
    #[serde(alias = "emerging", alias = "EMERGING")]
    Emerging,
}

impl RiskTypeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTypeCategory::Standard => "standard",
            RiskTypeCategory::ManMade => "manmade",
            RiskTypeCategory::Emerging => "emerging",
        }
    }
}

/// How a cascade is presented, given the risk types on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeKind {
    /// A standard risk triggering another risk
    Cause,
    /// A malicious actor group carrying out an attack
    Attack,
    /// An emerging risk catalyzing another risk
    Catalyzing,
}

impl CascadeKind {
    /// Classify a cascade by the risk type of its cause
    pub fn classify(cause: RiskTypeCategory) -> CascadeKind {
        match cause {
            RiskTypeCategory::Standard => CascadeKind::Cause,
            RiskTypeCategory::ManMade => CascadeKind::Attack,
            RiskTypeCategory::Emerging => CascadeKind::Catalyzing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeKind::Cause => "cause",
            CascadeKind::Attack => "attack",
            CascadeKind::Catalyzing => "catalyzing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenarios_are_ordered_by_severity() {
        assert!(Scenario::Considerable < Scenario::Major);
        assert!(Scenario::Major < Scenario::Extreme);
        let indices: Vec<usize> = Scenario::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_risk_type_accepts_backend_spellings() {
        let parsed: RiskTypeCategory = serde_json::from_str(r#""MANMADE""#).unwrap();
        assert_eq!(parsed, RiskTypeCategory::ManMade);
        let parsed: RiskTypeCategory = serde_json::from_str(r#""Standard""#).unwrap();
        assert_eq!(parsed, RiskTypeCategory::Standard);
    }

    #[test]
    fn test_cascade_kind_follows_cause_type() {
        assert_eq!(
            CascadeKind::classify(RiskTypeCategory::ManMade),
            CascadeKind::Attack
        );
        assert_eq!(
            CascadeKind::classify(RiskTypeCategory::Emerging),
            CascadeKind::Catalyzing
        );
    }
}
