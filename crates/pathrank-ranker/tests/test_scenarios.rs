//! End-to-end scenarios through the full analysis pipeline.
//!
//! Run with: cargo test --package pathrank-ranker --test test_scenarios

use pathrank_common::{AnalysisConfig, SourceDb};
use pathrank_ranker::domain_provider::StaticDomainGeneProvider;
use pathrank_ranker::ingest::load_hits_json;
use pathrank_ranker::literature_provider::MockLiteratureProvider;
use pathrank_ranker::tissue_provider::GeneRatioTissueProvider;
use pathrank_ranker::{
    run_analysis, AnalysisOutcome, AnalysisPipeline, AnalysisProviders, DiscoveryMethod,
    RelevanceFilter,
};
use pathrank_test_utils::{assert_eq, heart_development_hits, init_tracing, HitBuilder};

#[test]
fn test_heart_development_replication() {
    init_tracing();
    let report = run_analysis(
        heart_development_hits(),
        &AnalysisConfig::default(),
        &AnalysisProviders::default(),
    )
    .unwrap();

    assert_eq!(report.outcome, AnalysisOutcome::Ranked);
    assert_eq!(report.hypotheses.len(), 1);

    let top = &report.hypotheses[0];
    assert_eq!(top.pathway.canonical_id, "GO:0007507");
    assert_eq!(top.pathway.support_count, 2);
    assert_eq!(top.pathway.evidence_genes.len(), 20);
    assert!(top.pathway.combined_p_value < 1e-10);
    assert!(top.pathway.contributing_seed_genes.contains("GATA4"));
    assert!(top.pathway.contributing_seed_genes.contains("NKX2-5"));

    assert_eq!(top.lineage.discovery_method, DiscoveryMethod::Aggregated);
    assert_eq!(top.lineage.secondary_instances.len(), 1);
    assert_eq!(top.lineage.secondary_instances[0].origin_primary_pathway_id, "GO:0007507");
    assert_eq!(top.relevance.matched_direct_terms, vec!["heart".to_string()]);
    assert!(top.score_components.aggregation_weight > 1.0);
}

#[test]
fn test_boosted_phosphorylation_never_survives() {
    init_tracing();
    let hits = vec![
        HitBuilder::primary("GO:0016310", "phosphorylation")
            .description("cardiac hypertrophy signaling in heart failure development")
            .p_value(1e-30)
            .genes(&["PRKACA", "CAMK2D", "MAPK1"])
            .build(),
        HitBuilder::primary("hsa04260", "cardiac muscle contraction")
            .db(SourceDb::MetabolicReference)
            .p_value(1e-3)
            .genes(&["MYH6", "MYH7", "TNNT2"])
            .build(),
    ];
    let config = AnalysisConfig::default();

    // The annotation alone would rank it highly.
    let filter = RelevanceFilter::new(&config.relevance).unwrap();
    let aggregated = pathrank_ranker::aggregate_hits(&hits, &config.aggregation);
    let phospho = filter.annotate(&aggregated["GO:0016310"]);
    assert!(phospho.disease_context_boost_applied);
    assert!(phospho.relevance_score > 0.5);
    assert!(!phospho.passes_gate);

    let report = run_analysis(hits, &config, &AnalysisProviders::default()).unwrap();
    let ids: Vec<&str> = report.hypotheses.iter().map(|h| h.pathway.canonical_id.as_str()).collect();
    assert_eq!(ids, vec!["hsa04260"]);
    assert_eq!(report.stats.gate_rejections, 1);
    assert!(report.important_genes.iter().all(|g| g.symbol != "PRKACA"));
}

#[test]
fn test_auxiliary_evidence_is_passed_through() {
    let hits = vec![
        HitBuilder::primary("R-HSA-1", "cardiac conduction")
            .db(SourceDb::CuratedSignaling)
            .p_value(1e-4)
            .genes(&["SCN5A", "KCNH2", "GJA1"])
            .seeds(&["SCN5A"])
            .build(),
        HitBuilder::primary("R-HSA-2", "ventricular cardiac muscle development")
            .db(SourceDb::CuratedSignaling)
            .p_value(1e-4)
            .genes(&["TBX5", "HAND2", "NKX2-5"])
            .seeds(&["NKX2-5"])
            .build(),
    ];
    let tissue = GeneRatioTissueProvider::new().with("SCN5A", 4.0).with("KCNH2", 2.0);
    let literature = MockLiteratureProvider::new().with("cardiac conduction", 120);
    let domain = StaticDomainGeneProvider::new().with("SCN5A", 0.8);
    let providers = AnalysisProviders {
        tissue: Some(&tissue),
        literature: Some(&literature),
        domain: &domain,
    };

    let report = run_analysis(hits, &AnalysisConfig::default(), &providers).unwrap();
    let conduction = report
        .hypotheses
        .iter()
        .find(|h| h.pathway.canonical_id == "R-HSA-1")
        .unwrap();

    assert_eq!(conduction.score_components.tissue_specificity, Some(3.0));
    assert_eq!(conduction.score_components.literature_citations, Some(120));
    assert!(conduction.score_components.auxiliary_bonus() > 0.0);
    assert_eq!(report.important_genes[0].symbol, "SCN5A");

    let development = report
        .hypotheses
        .iter()
        .find(|h| h.pathway.canonical_id == "R-HSA-2")
        .unwrap();
    assert_eq!(development.score_components.tissue_specificity, None);
    assert_eq!(development.score_components.literature_bonus, 0.0);
}

#[test]
fn test_run_from_files() {
    let dir = tempfile::tempdir().unwrap();

    let hits_path = dir.path().join("hits.json");
    std::fs::write(
        &hits_path,
        r#"[
          {
            "source_pathway_id": "GO:0060047",
            "name": "heart contraction",
            "source_db": "GO",
            "p_value": 0.0004,
            "p_adjusted": 0.01,
            "evidence_genes": ["RYR2", "ATP2A2", "PLN"],
            "discovery_path": {"kind": "primary"},
            "seed_genes": ["PLN"]
          },
          {
            "source_pathway_id": "GO:0060047",
            "name": "heart contraction",
            "source_db": "GO",
            "p_value": 0.002,
            "p_adjusted": 0.03,
            "evidence_genes": ["RYR2", "CASQ2"],
            "discovery_path": {
              "kind": "secondary",
              "origin_primary_pathway_id": "hsa04260",
              "contributing_seed_genes": ["PLN"]
            }
          },
          {
            "source_pathway_id": "GO:0086091",
            "name": "regulation of heart rate by cardiac conduction",
            "source_db": "GO:BP",
            "p_value": "NA",
            "evidence_genes": ["SCN5A", "KCNH2"],
            "discovery_path": {"kind": "primary"}
          },
          {
            "source_pathway_id": "hsa04261",
            "name": "adrenergic signaling in cardiomyocytes",
            "p_value": 0.01,
            "evidence_genes": ["ADRB1"],
            "discovery_path": {"kind": "primary"}
          }
        ]"#,
    )
    .unwrap();

    let config_path = dir.path().join("analysis.yaml");
    std::fs::write(
        &config_path,
        "relevance:\n  disease_context: arrhythmia\ngenes:\n  top_genes: 2\n",
    )
    .unwrap();

    let loaded = load_hits_json(&hits_path).unwrap();
    assert_eq!(loaded.hits.len(), 3);
    let config = AnalysisConfig::from_yaml(config_path.to_str().unwrap()).unwrap();
    let pipeline = AnalysisPipeline::new(config).unwrap();
    let report = pipeline.run_loaded(loaded, &AnalysisProviders::default());

    assert_eq!(report.disease_context, "arrhythmia");
    assert_eq!(report.stats.input_hits, 4);
    assert_eq!(report.stats.malformed_hits, 1);
    assert_eq!(report.stats.unusable_statistics, 1);
    assert_eq!(report.rejected_hits[0].source_pathway_id, "hsa04261");

    let contraction = report
        .hypotheses
        .iter()
        .find(|h| h.pathway.canonical_id == "GO:0060047")
        .unwrap();
    assert_eq!(contraction.pathway.support_count, 2);
    assert_eq!(contraction.pathway.evidence_genes.len(), 4);
    assert!(contraction.pathway.source_primary_pathway_ids.contains("hsa04260"));

    let conduction = report
        .hypotheses
        .iter()
        .find(|h| h.pathway.canonical_id == "GO:0086091")
        .unwrap();
    assert_eq!(conduction.pathway.combined_p_value, 1.0);
    assert_eq!(conduction.score_components.p_value_component, 0.0);
    assert!(conduction.score_components.p_value_component.is_sign_positive());
    assert_eq!(report.important_genes.len(), 2);
}
