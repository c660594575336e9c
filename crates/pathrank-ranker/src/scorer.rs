//! Composite pathway score computation and ranking.
//!
//! S = -log10(max(p, ε)) × E × W_db × (1 + R) × A + B_tissue + B_lit
//!
//! where E is the saturating evidence component, W_db the source quality
//! weight, R the relevance score, A the replication weight, and the B
//! terms individually capped auxiliary bonuses. Bonuses are additive so a
//! missing auxiliary value never zeroes a strong statistical result.

use std::cmp::Ordering;

use pathrank_common::{AggregatedPathway, ScoringConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::lineage::Lineage;
use crate::literature_provider::LiteratureProvider;
use crate::normalise::{neg_log10, saturating};
use crate::relevance::{RelevanceAnnotation, RelevantPathway};
use crate::tissue_provider::TissueSpecificityProvider;

/// Named contributions to one composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub p_value_component: f64,
    pub evidence_component: f64,
    pub db_weight: f64,
    pub aggregation_weight: f64,
    pub relevance_boost: f64,
    /// Passed through from the tissue provider unmodified.
    pub tissue_specificity: Option<f64>,
    /// Passed through from the literature provider unmodified.
    pub literature_citations: Option<u32>,
    pub tissue_bonus: f64,
    pub literature_bonus: f64,
}

impl ScoreComponents {
    pub fn auxiliary_bonus(&self) -> f64 {
        self.tissue_bonus + self.literature_bonus
    }
}

/// Final scored pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHypothesis {
    #[serde(flatten)]
    pub pathway: AggregatedPathway,
    pub relevance: RelevanceAnnotation,
    pub score_components: ScoreComponents,
    pub composite_score: f64,
    /// 1-based, assigned after sorting.
    pub rank: usize,
    pub lineage: Lineage,
}

/// Optional auxiliary evidence collaborators.
#[derive(Clone, Copy, Default)]
pub struct AuxiliaryEvidence<'a> {
    pub tissue: Option<&'a dyn TissueSpecificityProvider>,
    pub literature: Option<&'a dyn LiteratureProvider>,
}

/// Replication weight: 1 + min(ln k, cap). Exactly 1.0 for a single hit.
pub fn aggregation_weight(support_count: usize, cap: f64) -> f64 {
    1.0 + (support_count.max(1) as f64).ln().min(cap)
}

pub fn compute_components(
    relevant: &RelevantPathway,
    config: &ScoringConfig,
    aux: &AuxiliaryEvidence<'_>,
) -> ScoreComponents {
    let pathway = &relevant.pathway;

    let tissue_specificity = aux
        .tissue
        .and_then(|t| t.specificity_ratio(&pathway.evidence_genes))
        .filter(|r| r.is_finite() && *r >= 0.0);
    let literature_citations = aux
        .literature
        .and_then(|l| l.citation_count(&pathway.name, &pathway.contributing_seed_genes));

    let tissue_bonus = tissue_specificity
        .map(|r| (r * config.tissue_bonus_weight).min(config.tissue_bonus_cap))
        .unwrap_or(0.0);
    let literature_bonus = literature_citations
        .map(|c| ((c as f64).ln_1p() * config.literature_bonus_weight).min(config.literature_bonus_cap))
        .unwrap_or(0.0);

    ScoreComponents {
        p_value_component: neg_log10(pathway.combined_p_value, config.p_value_epsilon),
        evidence_component: saturating(
            pathway.gene_count() as f64,
            config.evidence_saturation_genes,
            config.evidence_cap,
        ),
        db_weight: config.db_weights.weight_for(pathway.source_db),
        aggregation_weight: aggregation_weight(pathway.support_count, config.aggregation_cap),
        relevance_boost: 1.0 + relevant.relevance.relevance_score,
        tissue_specificity,
        literature_citations,
        tissue_bonus,
        literature_bonus,
    }
}

/// Compute the composite score from its components.
pub fn compute_composite_score(c: &ScoreComponents) -> f64 {
    let statistical = c.p_value_component
        * c.evidence_component
        * c.db_weight
        * c.relevance_boost
        * c.aggregation_weight;
    statistical + c.auxiliary_bonus()
}

/// Ranking order: composite score descending, then more evidence genes,
/// then more support, then canonical id ascending.
pub fn rank_order(a: &ScoredHypothesis, b: &ScoredHypothesis) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| b.pathway.gene_count().cmp(&a.pathway.gene_count()))
        .then_with(|| b.pathway.support_count.cmp(&a.pathway.support_count))
        .then_with(|| a.pathway.canonical_id.cmp(&b.pathway.canonical_id))
}

/// Score, sort and rank gate survivors.
pub fn score_pathways(
    survivors: &[RelevantPathway],
    config: &ScoringConfig,
    aux: &AuxiliaryEvidence<'_>,
) -> Vec<ScoredHypothesis> {
    let mut scored: Vec<ScoredHypothesis> = survivors
        .iter()
        .map(|relevant| {
            let score_components = compute_components(relevant, config, aux);
            ScoredHypothesis {
                composite_score: compute_composite_score(&score_components),
                score_components,
                relevance: relevant.relevance.clone(),
                lineage: Lineage::of(&relevant.pathway),
                pathway: relevant.pathway.clone(),
                rank: 0,
            }
        })
        .collect();

    scored.sort_by(rank_order);
    if let Some(max) = config.max_hypotheses {
        scored.truncate(max);
    }
    for (i, hypothesis) in scored.iter_mut().enumerate() {
        hypothesis.rank = i + 1;
    }

    info!(
        scored = scored.len(),
        top = scored.first().map(|h| h.pathway.canonical_id.as_str()).unwrap_or("-"),
        top_score = scored.first().map(|h| h.composite_score).unwrap_or(0.0),
        "Composite scoring complete"
    );
    scored
}
