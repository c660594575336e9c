//! Analysis configuration for one pathway ranking run.
//!
//! Every threshold, weight and lexicon the stages use lives here and is
//! passed explicitly to each stage, so concurrent runs with different
//! disease contexts never share state. Load from YAML/TOML/JSON and call
//! `validate()` before touching any hits.

use serde::{Deserialize, Serialize};

use crate::entities::SourceDb;
use crate::error::{PathrankError, Result};
use crate::lexicon::{TermCategory, TermLexicon};

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Hit merging and p-value combination
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Near-duplicate collapsing
    #[serde(default)]
    pub pruning: PruneConfig,

    /// Disease context, lexicon and relevance weights
    #[serde(default)]
    pub relevance: RelevanceConfig,

    /// Composite score weights
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Important-gene ranking
    #[serde(default)]
    pub genes: GeneRankConfig,
}

// ── Aggregation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Smallest p-value fed into ln() during Fisher combination.
    #[serde(default = "default_p_value_floor")]
    pub p_value_floor: f64,

    /// Count byte-identical repeated hits once.
    #[serde(default = "default_true")]
    pub collapse_identical_hits: bool,
}

fn default_p_value_floor() -> f64 { 1e-300 }
fn default_true() -> bool { true }

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            p_value_floor: default_p_value_floor(),
            collapse_identical_hits: true,
        }
    }
}

// ── Pruning ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Jaccard similarity at or above which two gene sets are redundant.
    #[serde(default = "default_jaccard_threshold")]
    pub jaccard_threshold: f64,
}

fn default_jaccard_threshold() -> f64 { 0.85 }

impl Default for PruneConfig {
    fn default() -> Self {
        Self { jaccard_threshold: default_jaccard_threshold() }
    }
}

// ── Relevance ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceConfig {
    /// Free-text disease context, e.g. "heart failure".
    #[serde(default = "default_disease_context")]
    pub disease_context: String,

    #[serde(default)]
    pub lexicon: TermLexicon,

    #[serde(default)]
    pub weights: RelevanceWeights,
}

fn default_disease_context() -> String { "heart failure".to_string() }

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            disease_context: default_disease_context(),
            lexicon: TermLexicon::default(),
            weights: RelevanceWeights::default(),
        }
    }
}

/// Per-category weights for the soft relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceWeights {
    #[serde(default = "default_direct_weight")]
    pub direct: f64,

    #[serde(default = "default_process_weight")]
    pub process: f64,

    #[serde(default = "default_pathology_weight")]
    pub pathology: f64,

    #[serde(default = "default_context_weight")]
    pub disease_context: f64,

    /// Distinct matches per category at which its sub-score saturates.
    #[serde(default = "default_match_saturation")]
    pub match_saturation: usize,

    /// Multiplier when a disease-context term matches the run's label.
    #[serde(default = "default_context_boost")]
    pub disease_context_boost: f64,

    /// Multiplier applied when a negative term matches.
    #[serde(default = "default_negative_penalty")]
    pub negative_penalty: f64,
}

fn default_direct_weight() -> f64 { 0.50 }
fn default_process_weight() -> f64 { 0.20 }
fn default_pathology_weight() -> f64 { 0.20 }
fn default_context_weight() -> f64 { 0.10 }
fn default_match_saturation() -> usize { 2 }
fn default_context_boost() -> f64 { 1.5 }
fn default_negative_penalty() -> f64 { 0.5 }

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            direct: default_direct_weight(),
            process: default_process_weight(),
            pathology: default_pathology_weight(),
            disease_context: default_context_weight(),
            match_saturation: default_match_saturation(),
            disease_context_boost: default_context_boost(),
            negative_penalty: default_negative_penalty(),
        }
    }
}

impl RelevanceWeights {
    /// Weight of one positive category. Negative terms carry no weight of
    /// their own; they act through `negative_penalty`.
    pub fn category_weight(&self, category: TermCategory) -> f64 {
        match category {
            TermCategory::Direct => self.direct,
            TermCategory::Process => self.process,
            TermCategory::Pathology => self.pathology,
            TermCategory::DiseaseContext => self.disease_context,
            TermCategory::Negative => 0.0,
        }
    }

    /// Sum of the positive category weights.
    pub fn positive_sum(&self) -> f64 {
        self.direct + self.process + self.pathology + self.disease_context
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Quality weight per source database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbWeights {
    #[serde(default = "default_curated_weight")]
    pub curated_signaling: f64,

    #[serde(default = "default_metabolic_weight")]
    pub metabolic_reference: f64,

    #[serde(default = "default_community_weight")]
    pub community_curated: f64,

    #[serde(default = "default_ontology_weight")]
    pub ontology: f64,
}

fn default_curated_weight() -> f64 { 1.5 }
fn default_metabolic_weight() -> f64 { 1.5 }
fn default_community_weight() -> f64 { 1.2 }
fn default_ontology_weight() -> f64 { 1.0 }

impl Default for DbWeights {
    fn default() -> Self {
        Self {
            curated_signaling: default_curated_weight(),
            metabolic_reference: default_metabolic_weight(),
            community_curated: default_community_weight(),
            ontology: default_ontology_weight(),
        }
    }
}

impl DbWeights {
    pub fn weight_for(&self, db: SourceDb) -> f64 {
        match db {
            SourceDb::CuratedSignaling => self.curated_signaling,
            SourceDb::MetabolicReference => self.metabolic_reference,
            SourceDb::CommunityCurated => self.community_curated,
            SourceDb::Ontology => self.ontology,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub db_weights: DbWeights,

    /// Gene count that yields an evidence component of 1.0.
    #[serde(default = "default_evidence_saturation")]
    pub evidence_saturation_genes: f64,

    /// Upper bound of the evidence component.
    #[serde(default = "default_evidence_cap")]
    pub evidence_cap: f64,

    /// Floor for the combined p-value before -log10.
    #[serde(default = "default_p_value_epsilon")]
    pub p_value_epsilon: f64,

    /// Upper bound of ln(support_count) in the aggregation weight.
    #[serde(default = "default_aggregation_cap")]
    pub aggregation_cap: f64,

    /// Bonus per unit of tissue specificity ratio.
    #[serde(default = "default_tissue_weight")]
    pub tissue_bonus_weight: f64,

    #[serde(default = "default_tissue_cap")]
    pub tissue_bonus_cap: f64,

    /// Bonus per unit of ln(1 + citations).
    #[serde(default = "default_literature_weight")]
    pub literature_bonus_weight: f64,

    #[serde(default = "default_literature_cap")]
    pub literature_bonus_cap: f64,

    /// Keep only the best N hypotheses after ranking.
    #[serde(default)]
    pub max_hypotheses: Option<usize>,
}

fn default_evidence_saturation() -> f64 { 10.0 }
fn default_evidence_cap() -> f64 { 2.0 }
fn default_p_value_epsilon() -> f64 { 1e-300 }
fn default_aggregation_cap() -> f64 { 0.5 }
fn default_tissue_weight() -> f64 { 0.5 }
fn default_tissue_cap() -> f64 { 1.0 }
fn default_literature_weight() -> f64 { 0.5 }
fn default_literature_cap() -> f64 { 1.5 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            db_weights: DbWeights::default(),
            evidence_saturation_genes: default_evidence_saturation(),
            evidence_cap: default_evidence_cap(),
            p_value_epsilon: default_p_value_epsilon(),
            aggregation_cap: default_aggregation_cap(),
            tissue_bonus_weight: default_tissue_weight(),
            tissue_bonus_cap: default_tissue_cap(),
            literature_bonus_weight: default_literature_weight(),
            literature_bonus_cap: default_literature_cap(),
            max_hypotheses: None,
        }
    }
}

// ── Important genes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneRankConfig {
    /// Only the best N hypotheses feed gene ranking.
    #[serde(default = "default_top_pathways")]
    pub top_pathways: usize,

    /// Number of genes to return.
    #[serde(default = "default_top_genes")]
    pub top_genes: usize,

    #[serde(default = "default_pathway_count_exponent")]
    pub pathway_count_exponent: f64,
}

fn default_top_pathways() -> usize { 50 }
fn default_top_genes() -> usize { 20 }
fn default_pathway_count_exponent() -> f64 { 1.2 }

impl Default for GeneRankConfig {
    fn default() -> Self {
        Self {
            top_pathways: default_top_pathways(),
            top_genes: default_top_genes(),
            pathway_count_exponent: default_pathway_count_exponent(),
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

fn require_non_negative(parameter: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PathrankError::config(
            parameter,
            format!("must be a finite non-negative number, got {value}"),
        ));
    }
    Ok(())
}

fn require_positive(parameter: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PathrankError::config(
            parameter,
            format!("must be a finite positive number, got {value}"),
        ));
    }
    Ok(())
}

fn require_unit_interval(parameter: &str, value: f64, allow_zero: bool) -> Result<()> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !value.is_finite() || !lower_ok || value > 1.0 {
        let range = if allow_zero { "[0, 1]" } else { "(0, 1]" };
        return Err(PathrankError::config(
            parameter,
            format!("must lie in {range}, got {value}"),
        ));
    }
    Ok(())
}

impl AnalysisConfig {
    /// Check every weight and threshold. Fails on the first offending
    /// parameter, naming it by its dotted path.
    pub fn validate(&self) -> Result<()> {
        let agg = &self.aggregation;
        require_unit_interval("aggregation.p_value_floor", agg.p_value_floor, false)?;

        require_unit_interval("pruning.jaccard_threshold", self.pruning.jaccard_threshold, false)?;

        let rel = &self.relevance;
        let w = &rel.weights;
        require_non_negative("relevance.weights.direct", w.direct)?;
        require_non_negative("relevance.weights.process", w.process)?;
        require_non_negative("relevance.weights.pathology", w.pathology)?;
        require_non_negative("relevance.weights.disease_context", w.disease_context)?;
        if w.positive_sum() <= 0.0 {
            return Err(PathrankError::config(
                "relevance.weights",
                "at least one category weight must be positive",
            ));
        }
        if w.match_saturation == 0 {
            return Err(PathrankError::config(
                "relevance.weights.match_saturation",
                "must be at least 1",
            ));
        }
        if !w.disease_context_boost.is_finite() || w.disease_context_boost < 1.0 {
            return Err(PathrankError::config(
                "relevance.weights.disease_context_boost",
                format!("must be a finite multiplier >= 1.0, got {}", w.disease_context_boost),
            ));
        }
        require_unit_interval("relevance.weights.negative_penalty", w.negative_penalty, true)?;

        if rel.lexicon.direct_terms.is_empty() {
            return Err(PathrankError::config(
                "relevance.lexicon.direct_terms",
                "must contain at least one term; the inclusion gate needs it",
            ));
        }
        for category in TermCategory::ALL {
            if rel.lexicon.terms(category).iter().any(|t| t.trim().is_empty()) {
                return Err(PathrankError::config(
                    format!("relevance.lexicon.{}", category.as_str()),
                    "contains a blank term",
                ));
            }
        }

        let s = &self.scoring;
        for db in SourceDb::ALL {
            require_non_negative(
                &format!("scoring.db_weights.{}", db.as_str()),
                s.db_weights.weight_for(db),
            )?;
        }
        require_positive("scoring.evidence_saturation_genes", s.evidence_saturation_genes)?;
        require_positive("scoring.evidence_cap", s.evidence_cap)?;
        require_unit_interval("scoring.p_value_epsilon", s.p_value_epsilon, false)?;
        require_non_negative("scoring.aggregation_cap", s.aggregation_cap)?;
        require_non_negative("scoring.tissue_bonus_weight", s.tissue_bonus_weight)?;
        require_non_negative("scoring.tissue_bonus_cap", s.tissue_bonus_cap)?;
        require_non_negative("scoring.literature_bonus_weight", s.literature_bonus_weight)?;
        require_non_negative("scoring.literature_bonus_cap", s.literature_bonus_cap)?;
        if s.max_hypotheses == Some(0) {
            return Err(PathrankError::config(
                "scoring.max_hypotheses",
                "must be at least 1 when set",
            ));
        }

        let g = &self.genes;
        if g.top_pathways == 0 {
            return Err(PathrankError::config("genes.top_pathways", "must be at least 1"));
        }
        if g.top_genes == 0 {
            return Err(PathrankError::config("genes.top_genes", "must be at least 1"));
        }
        require_positive("genes.pathway_count_exponent", g.pathway_count_exponent)?;

        Ok(())
    }

    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
