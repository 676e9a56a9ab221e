//! Integration tests for divergence reports and consensus cascades

use bnra_core::{
    analyze, build_consensus_cascade, cascade_divergence, cascade_field_for,
    parameter_divergence, stats_of, AnalysisOptions, CascadeAnalysis, DivergenceBand,
    Parameter, RiskFileExport, Scenario, Section,
};
use serde_json::json;

fn export() -> RiskFileExport {
    serde_json::from_value(json!({
        "risk_files": [
            {
                "id": "rf-flood",
                "title": "Riverine flooding",
                "risk_type": "Standard",
                "direct_analyses": [
                    {
                        "_cr4de_expert_value": "expert-1",
                        "cr4de_dp_quanti_c": "DP2",
                        "cr4de_di_quanti_ha_c": "Ha0",
                        "cr4de_di_quanti_hb_c": "Hb2",
                        "cr4de_di_quanti_hc_c": null,
                        "cr4de_dp_quali_c": "Floods every decade along the Meuse"
                    },
                    {
                        "_cr4de_expert_value": "expert-2",
                        "cr4de_dp_quanti_c": "DP2",
                        "cr4de_di_quanti_ha_c": "Ha6",
                        "cr4de_di_quanti_hb_c": "Hb2",
                        "cr4de_quality": {"h_c": 4.0}
                    }
                ],
                "cascades": [
                    {
                        "id": "cascade-1",
                        "cause": "Riverine flooding",
                        "effect": "Power outage",
                        "analyses": [
                            {"_cr4de_cascade_value": "cascade-1", "cr4de_c2c": "CP1"},
                            {"_cr4de_cascade_value": "cascade-1", "cr4de_c2c": "CP2"},
                            {"_cr4de_cascade_value": "cascade-1", "cr4de_c2c": "CP3"}
                        ]
                    }
                ]
            },
            {
                "id": "rf-emerging",
                "title": "Autonomous weapons",
                "risk_type": "Emerging"
            }
        ]
    }))
    .unwrap()
}

#[test]
fn test_three_expert_cascade_example() {
    let export = export();
    let rf = &export.risk_files[0];
    let analyses = &rf.cascades[0].analyses;

    let c2c = cascade_field_for(Scenario::Considerable, Scenario::Considerable);
    let values: Vec<Option<&str>> = analyses.iter().map(|a| a.cell(c2c)).collect();
    let stats = stats_of(&values, None).unwrap().unwrap();
    assert_eq!(stats.avg, 2.0);
    assert_eq!(stats.std, 0.8);

    let consensus = build_consensus_cascade(analyses).unwrap();
    assert_eq!(consensus.c2c.as_deref(), Some("CP2"));
    assert_eq!(consensus.cascade.as_deref(), Some("cascade-1"));
}

#[test]
fn test_human_impact_divergence_skips_unanswered_subfield() {
    let export = export();
    let rf = &export.risk_files[0];
    let divergence = parameter_divergence(
        &rf.direct_analyses,
        Scenario::Considerable,
        &Section::new(Parameter::H),
    )
    .unwrap();
    // Ha: [0, 6] -> std 3.0, Hb: [2, 2] -> std 0.0, Hc unanswered
    // mean 1.5 / 6 = 0.25
    assert_eq!(divergence, 0.25);
}

#[test]
fn test_analyze_export_sorts_and_bands() {
    let reports = analyze(&export(), &AnalysisOptions::default()).unwrap();
    assert_eq!(reports.len(), 2);

    // Flood has a medium human impact divergence and sorts first
    let flood = &reports[0];
    assert_eq!(flood.id, "rf-flood");
    assert_eq!(flood.band, DivergenceBand::Medium);
    assert_eq!(flood.experts, 2);
    assert_eq!(flood.sections.len(), 21);
    assert_eq!(flood.cascades.len(), 1);
    assert_eq!(flood.cascades[0].consensus["c2c"].as_deref(), Some("CP2"));

    let emerging = &reports[1];
    assert_eq!(emerging.id, "rf-emerging");
    assert!(emerging.sections.is_empty());
    assert_eq!(emerging.band, DivergenceBand::Low);
}

#[test]
fn test_weighted_field_stats_in_report() {
    let reports = analyze(&export(), &AnalysisOptions::default()).unwrap();
    let flood = &reports[0];

    let human = flood
        .sections
        .iter()
        .find(|s| s.parameter == Parameter::H && s.scenario == Scenario::Considerable)
        .unwrap();
    let ha = &human.fields[0];
    assert_eq!(ha.field, "cr4de_di_quanti_ha_c");
    assert_eq!(ha.respondents, 2);
    // (0*2.5 + 6*4) / 6.5 = 3.69
    assert_eq!(ha.stats.as_ref().unwrap().avg_label, "Ha3.7");

    let hc = &human.fields[2];
    assert_eq!(hc.respondents, 0);
    assert!(hc.stats.is_none());
}

#[test]
fn test_min_band_keeps_overall_band() {
    let options = AnalysisOptions {
        min_band: DivergenceBand::High,
        ..Default::default()
    };
    let reports = analyze(&export(), &options).unwrap();
    let flood = reports.iter().find(|r| r.id == "rf-flood").unwrap();
    assert_eq!(flood.band, DivergenceBand::Medium);
    assert!(flood.sections.iter().all(|s| s.band == DivergenceBand::High));
    assert!(flood.cascades.is_empty());
}

#[test]
fn test_sparse_inputs_never_fail() {
    assert_eq!(cascade_divergence(&[]).unwrap(), 0.0);
    let blank = vec![CascadeAnalysis::default(), CascadeAnalysis::default()];
    assert_eq!(cascade_divergence(&blank).unwrap(), 0.0);
    let consensus = build_consensus_cascade(&blank).unwrap();
    assert_eq!(consensus, CascadeAnalysis::default());
}

#[test]
fn test_malformed_export_value_is_reported() {
    let mut export = export();
    export.risk_files[0].direct_analyses[0].fields.insert(
        "cr4de_dp_quanti_c".to_string(),
        json!("two"),
    );
    let err = analyze(&export, &AnalysisOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "malformed scale value: \"two\"");
}
