//! Domain relevance scoring and the hard inclusion gate.
//!
//! Two separate outputs per pathway:
//! - a soft `relevance_score` in [0, 1], built from weighted term-category
//!   matches over the name and description, boosted when the pathway
//!   speaks to the run's disease context and penalised for off-domain
//!   terms. Used only for ranking.
//! - `passes_gate`, true iff the pathway *name* contains at least one
//!   direct term. This alone decides inclusion; no score, however high,
//!   substitutes for it.
//!
//! The gate is a pure predicate on the name, so filtering a filtered set
//! removes nothing.

use pathrank_common::{
    AggregatedPathway, RelevanceConfig, RelevanceWeights, Result, TermCategory,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::lexicon::CompiledLexicon;

/// Per-category contributions to the relevance score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceBreakdown {
    pub direct: f64,
    pub process: f64,
    pub pathology: f64,
    pub disease_context: f64,
    /// Amount removed by the negative-term penalty.
    pub negative_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceAnnotation {
    pub relevance_score: f64,
    pub passes_gate: bool,
    pub breakdown: RelevanceBreakdown,
    pub disease_context_boost_applied: bool,
    /// Direct terms found in the name; empty iff the gate failed.
    pub matched_direct_terms: Vec<String>,
}

/// A pathway that passed the gate, with its annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantPathway {
    pub pathway: AggregatedPathway,
    pub relevance: RelevanceAnnotation,
}

/// A pathway removed by the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRejection {
    pub canonical_id: String,
    pub name: String,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Gate survivors, in input order.
    pub survivors: Vec<RelevantPathway>,
    pub rejected: Vec<GateRejection>,
}

impl FilterOutcome {
    /// No candidate passed the gate: a legitimate "zero relevant results"
    /// outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }

    /// The surviving pathways without their annotations.
    pub fn pathways(&self) -> Vec<AggregatedPathway> {
        self.survivors.iter().map(|s| s.pathway.clone()).collect()
    }
}

/// Relevance filter for one disease context.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    lexicon: CompiledLexicon,
    weights: RelevanceWeights,
    disease_context: String,
    /// Disease-context terms named by the run's own label.
    label_context_terms: Vec<String>,
}

impl RelevanceFilter {
    pub fn new(config: &RelevanceConfig) -> Result<Self> {
        let lexicon = CompiledLexicon::compile(&config.lexicon)?;
        let label_context_terms =
            lexicon.matches(TermCategory::DiseaseContext, &config.disease_context);
        debug!(
            disease_context = %config.disease_context,
            label_terms = ?label_context_terms,
            "Relevance filter ready"
        );
        Ok(Self {
            lexicon,
            weights: config.weights.clone(),
            disease_context: config.disease_context.clone(),
            label_context_terms,
        })
    }

    pub fn disease_context(&self) -> &str {
        &self.disease_context
    }

    fn category_score(&self, category: TermCategory, matched: usize) -> f64 {
        let saturation = self.weights.match_saturation.max(1);
        let fraction = matched.min(saturation) as f64 / saturation as f64;
        self.weights.category_weight(category) * fraction
    }

    /// The inclusion gate: a direct term in the name.
    pub fn passes_gate(&self, name: &str) -> bool {
        self.lexicon.any_match(TermCategory::Direct, name)
    }

    pub fn annotate(&self, pathway: &AggregatedPathway) -> RelevanceAnnotation {
        let text = match &pathway.description {
            Some(desc) => format!("{} {}", pathway.name, desc),
            None => pathway.name.clone(),
        };

        let count = |category| self.lexicon.matches(category, &text).len();
        let mut breakdown = RelevanceBreakdown {
            direct: self.category_score(TermCategory::Direct, count(TermCategory::Direct)),
            process: self.category_score(TermCategory::Process, count(TermCategory::Process)),
            pathology: self.category_score(TermCategory::Pathology, count(TermCategory::Pathology)),
            disease_context: self
                .category_score(TermCategory::DiseaseContext, count(TermCategory::DiseaseContext)),
            negative_penalty: 0.0,
        };

        let mut score =
            breakdown.direct + breakdown.process + breakdown.pathology + breakdown.disease_context;

        // Boost only when the pathway mentions a context term the run's label names.
        let boost_applied = self
            .lexicon
            .matches(TermCategory::DiseaseContext, &text)
            .iter()
            .any(|t| self.label_context_terms.contains(t));
        if boost_applied {
            score *= self.weights.disease_context_boost;
        }

        if self.lexicon.any_match(TermCategory::Negative, &text) {
            let penalised = score * self.weights.negative_penalty;
            breakdown.negative_penalty = score - penalised;
            score = penalised;
        }

        let matched_direct_terms = self.lexicon.matches(TermCategory::Direct, &pathway.name);

        RelevanceAnnotation {
            relevance_score: score.clamp(0.0, 1.0),
            passes_gate: !matched_direct_terms.is_empty(),
            breakdown,
            disease_context_boost_applied: boost_applied,
            matched_direct_terms,
        }
    }

    /// Annotate every pathway and keep only gate survivors.
    pub fn apply(&self, pathways: &[AggregatedPathway]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for pathway in pathways {
            let relevance = self.annotate(pathway);
            if relevance.passes_gate {
                outcome.survivors.push(RelevantPathway {
                    pathway: pathway.clone(),
                    relevance,
                });
            } else {
                debug!(
                    pathway = %pathway.canonical_id,
                    name = %pathway.name,
                    relevance_score = relevance.relevance_score,
                    "Rejected by relevance gate"
                );
                outcome.rejected.push(GateRejection {
                    canonical_id: pathway.canonical_id.clone(),
                    name: pathway.name.clone(),
                    relevance_score: relevance.relevance_score,
                });
            }
        }

        info!(
            disease_context = %self.disease_context,
            candidates = pathways.len(),
            survivors = outcome.survivors.len(),
            rejected = outcome.rejected.len(),
            "Relevance gate applied"
        );
        outcome
    }
}
