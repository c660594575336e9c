//! Important-gene ranking over the final hypothesis list.
//!
//! importance(g) = pathway_count^α × mean_composite × (1 + domain_score)

use std::cmp::Ordering;
use std::collections::BTreeMap;

use pathrank_common::GeneRankConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain_provider::DomainGeneProvider;
use crate::scorer::ScoredHypothesis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportantGene {
    pub symbol: String,
    pub pathway_count: usize,
    pub mean_composite_score: f64,
    pub domain_score: f64,
    pub importance_score: f64,
    pub rank: usize,
    /// Canonical ids of the hypotheses containing the gene, best first.
    pub pathways: Vec<String>,
}

pub fn importance_score(pathway_count: usize, mean_composite: f64, domain_score: f64, exponent: f64) -> f64 {
    (pathway_count as f64).powf(exponent) * mean_composite * (1.0 + domain_score)
}

/// Importance descending, then domain score descending, then symbol.
fn gene_order(a: &ImportantGene, b: &ImportantGene) -> Ordering {
    b.importance_score
        .total_cmp(&a.importance_score)
        .then_with(|| b.domain_score.total_cmp(&a.domain_score))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Rank genes across the best `top_pathways` hypotheses.
/// `hypotheses` must already be in rank order.
pub fn rank_important_genes(
    hypotheses: &[ScoredHypothesis],
    domain: &dyn DomainGeneProvider,
    config: &GeneRankConfig,
) -> Vec<ImportantGene> {
    // symbol → (sum of composite scores, containing pathway ids)
    let mut tally: BTreeMap<&str, (f64, Vec<String>)> = BTreeMap::new();

    for hypothesis in hypotheses.iter().take(config.top_pathways) {
        for gene in &hypothesis.pathway.evidence_genes {
            let entry = tally.entry(gene.as_str()).or_default();
            entry.0 += hypothesis.composite_score;
            entry.1.push(hypothesis.pathway.canonical_id.clone());
        }
    }

    let mut genes: Vec<ImportantGene> = tally
        .into_iter()
        .map(|(symbol, (sum, pathways))| {
            let pathway_count = pathways.len();
            let mean_composite_score = sum / pathway_count as f64;
            let domain_score = domain
                .domain_score(symbol)
                .filter(|s| s.is_finite())
                .map(|s| s.clamp(0.0, 1.0))
                .unwrap_or(0.0);
            ImportantGene {
                symbol: symbol.to_string(),
                pathway_count,
                mean_composite_score,
                domain_score,
                importance_score: importance_score(
                    pathway_count,
                    mean_composite_score,
                    domain_score,
                    config.pathway_count_exponent,
                ),
                rank: 0,
                pathways,
            }
        })
        .collect();

    genes.sort_by(gene_order);
    genes.truncate(config.top_genes);
    for (i, gene) in genes.iter_mut().enumerate() {
        gene.rank = i + 1;
    }

    info!(
        genes = genes.len(),
        top = genes.first().map(|g| g.symbol.as_str()).unwrap_or("-"),
        "Important gene ranking complete"
    );
    genes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_provider::{NoDomainScores, StaticDomainGeneProvider};
    use crate::lineage::Lineage;
    use crate::relevance::{RelevanceAnnotation, RelevanceBreakdown};
    use crate::scorer::ScoreComponents;
    use pathrank_common::{AggregatedPathway, SourceDb};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn hypothesis(id: &str, genes: &[&str], score: f64, rank: usize) -> ScoredHypothesis {
        let pathway = AggregatedPathway {
            canonical_id: id.to_string(),
            name: format!("heart pathway {id}"),
            description: None,
            source_db: SourceDb::Ontology,
            evidence_genes: genes.iter().map(|g| g.to_string()).collect(),
            support_count: 1,
            source_primary_pathway_ids: BTreeSet::new(),
            source_secondary_instances: vec![],
            combined_p_value: 0.001,
            best_p_adjusted: None,
            aggregation_score: 3.0,
            consistency_score: 1.0,
            confidence_score: 0.3,
            contributing_seed_genes: BTreeSet::new(),
            hit_p_values: vec![0.001],
            unusable_statistics: 0,
        };
        ScoredHypothesis {
            lineage: Lineage::of(&pathway),
            pathway,
            relevance: RelevanceAnnotation {
                relevance_score: 0.5,
                passes_gate: true,
                breakdown: RelevanceBreakdown::default(),
                disease_context_boost_applied: false,
                matched_direct_terms: vec!["heart".to_string()],
            },
            score_components: ScoreComponents {
                p_value_component: 3.0,
                evidence_component: 1.0,
                db_weight: 1.0,
                aggregation_weight: 1.0,
                relevance_boost: 1.5,
                tissue_specificity: None,
                literature_citations: None,
                tissue_bonus: 0.0,
                literature_bonus: 0.0,
            },
            composite_score: score,
            rank,
        }
    }

    #[test]
    fn test_domain_score_breaks_equal_frequency() {
        let hypotheses: Vec<_> = (0..5)
            .map(|i| hypothesis(&format!("P{i}"), &["A", "B"], 10.0, i + 1))
            .collect();
        let domain = StaticDomainGeneProvider::new().with("A", 0.9).with("B", 0.1);

        let genes = rank_important_genes(&hypotheses, &domain, &GeneRankConfig::default());
        assert_eq!(genes[0].symbol, "A");
        assert_eq!(genes[1].symbol, "B");
        assert_eq!(genes[0].pathway_count, 5);
        assert!((genes[0].mean_composite_score - 10.0).abs() < 1e-12);
        let expected = 5f64.powf(1.2) * 10.0 * 1.9;
        assert!((genes[0].importance_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_dominates() {
        let hypotheses = vec![
            hypothesis("P1", &["COMMON", "RARE"], 5.0, 1),
            hypothesis("P2", &["COMMON"], 5.0, 2),
            hypothesis("P3", &["COMMON"], 5.0, 3),
        ];
        let genes = rank_important_genes(&hypotheses, &NoDomainScores, &GeneRankConfig::default());
        assert_eq!(genes[0].symbol, "COMMON");
        assert_eq!(genes[0].pathways, vec!["P1", "P2", "P3"]);
        assert_eq!(genes[1].domain_score, 0.0);
    }

    #[test]
    fn test_symbol_breaks_full_ties() {
        let hypotheses = vec![hypothesis("P1", &["ZFPM2", "GATA4"], 5.0, 1)];
        let genes = rank_important_genes(&hypotheses, &NoDomainScores, &GeneRankConfig::default());
        assert_eq!(genes[0].symbol, "GATA4");
        assert_eq!(genes[1].symbol, "ZFPM2");
    }

    #[test]
    fn test_caps() {
        let hypotheses = vec![
            hypothesis("P1", &["A", "B", "C"], 9.0, 1),
            hypothesis("P2", &["D"], 8.0, 2),
        ];
        let config = GeneRankConfig { top_pathways: 1, top_genes: 2, ..Default::default() };
        let genes = rank_important_genes(&hypotheses, &NoDomainScores, &config);
        assert_eq!(genes.len(), 2);
        assert!(genes.iter().all(|g| g.symbol != "D"));
        assert_eq!(genes.iter().map(|g| g.rank).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_empty_input() {
        let genes = rank_important_genes(&[], &NoDomainScores, &GeneRankConfig::default());
        assert!(genes.is_empty());
    }
}
