//! One analysis run: intake → aggregate → prune → gate → score → rank genes.
//!
//! Each stage takes its predecessor's output by reference and returns a
//! new value. The only result a caller ever sees is the `AnalysisReport`
//! built from the gated, scored hypotheses; no pre-gate intermediate is
//! reachable from it.

use chrono::{DateTime, Utc};
use pathrank_common::{AnalysisConfig, PathwayHit, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::aggregate::aggregate_hits;
use crate::domain_provider::{DomainGeneProvider, NoDomainScores};
use crate::genes::{rank_important_genes, ImportantGene};
use crate::ingest::{validate_hits, LoadedHits, RejectedHit};
use crate::literature_provider::LiteratureProvider;
use crate::prune::{prune_redundant, SupersededPathway};
use crate::relevance::RelevanceFilter;
use crate::scorer::{score_pathways, AuxiliaryEvidence, ScoredHypothesis};
use crate::tissue_provider::TissueSpecificityProvider;

/// External lookups consulted during a run.
#[derive(Clone, Copy)]
pub struct AnalysisProviders<'a> {
    pub tissue: Option<&'a dyn TissueSpecificityProvider>,
    pub literature: Option<&'a dyn LiteratureProvider>,
    pub domain: &'a dyn DomainGeneProvider,
}

impl Default for AnalysisProviders<'_> {
    fn default() -> Self {
        Self {
            tissue: None,
            literature: None,
            domain: &NoDomainScores,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Ranked,
    /// The gate removed every candidate. A valid biological result.
    NoRelevantResults,
}

/// Per-stage counts for the enclosing pipeline to report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub input_hits: usize,
    pub malformed_hits: usize,
    pub unusable_statistics: usize,
    pub aggregated_pathways: usize,
    pub superseded_pathways: usize,
    pub gate_rejections: usize,
    pub hypotheses: usize,
    pub important_genes: usize,
}

/// Final output of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub disease_context: String,
    pub outcome: AnalysisOutcome,
    pub hypotheses: Vec<ScoredHypothesis>,
    pub important_genes: Vec<ImportantGene>,
    pub superseded: Vec<SupersededPathway>,
    pub rejected_hits: Vec<RejectedHit>,
    pub stats: RunStats,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.outcome == AnalysisOutcome::NoRelevantResults
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A validated configuration plus its compiled relevance filter. Reusable
/// across runs; holds no per-run state.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    filter: RelevanceFilter,
}

impl AnalysisPipeline {
    /// Validates the configuration before any hit is processed.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let filter = RelevanceFilter::new(&config.relevance)?;
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(&self, hits: Vec<PathwayHit>, providers: &AnalysisProviders<'_>) -> AnalysisReport {
        self.run_with_rejections(hits, Vec::new(), providers)
    }

    /// Run over hits read by `load_hits_json`. Records the loader could not
    /// decode are reported as malformed hits of this run.
    pub fn run_loaded(&self, loaded: LoadedHits, providers: &AnalysisProviders<'_>) -> AnalysisReport {
        self.run_with_rejections(loaded.hits, loaded.rejected, providers)
    }

    fn run_with_rejections(
        &self,
        hits: Vec<PathwayHit>,
        mut rejected_hits: Vec<RejectedHit>,
        providers: &AnalysisProviders<'_>,
    ) -> AnalysisReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("analysis", %run_id, disease_context = %self.filter.disease_context());
        let _guard = span.enter();

        let input_hits = hits.len() + rejected_hits.len();
        let intake = validate_hits(hits);
        rejected_hits.extend(intake.rejected);
        let aggregated = aggregate_hits(&intake.accepted, &self.config.aggregation);
        let pruned = prune_redundant(&aggregated, &self.config.pruning);
        let filtered = self.filter.apply(&pruned.retained);

        let aux = AuxiliaryEvidence {
            tissue: providers.tissue,
            literature: providers.literature,
        };
        let hypotheses = score_pathways(&filtered.survivors, &self.config.scoring, &aux);
        let important_genes = rank_important_genes(&hypotheses, providers.domain, &self.config.genes);

        let outcome = if hypotheses.is_empty() {
            warn!(candidates = pruned.retained.len(), "No pathway passed the relevance gate");
            AnalysisOutcome::NoRelevantResults
        } else {
            AnalysisOutcome::Ranked
        };

        let stats = RunStats {
            input_hits,
            malformed_hits: rejected_hits.len(),
            unusable_statistics: intake.unusable_statistics,
            aggregated_pathways: aggregated.len(),
            superseded_pathways: pruned.superseded.len(),
            gate_rejections: filtered.rejected.len(),
            hypotheses: hypotheses.len(),
            important_genes: important_genes.len(),
        };
        info!(?stats, ?outcome, "Analysis complete");

        AnalysisReport {
            run_id,
            generated_at: Utc::now(),
            disease_context: self.filter.disease_context().to_string(),
            outcome,
            hypotheses,
            important_genes,
            superseded: pruned.superseded,
            rejected_hits,
            stats,
        }
    }
}

/// Validate `config`, then run every stage over `hits`.
pub fn run_analysis(
    hits: Vec<PathwayHit>,
    config: &AnalysisConfig,
    providers: &AnalysisProviders<'_>,
) -> Result<AnalysisReport> {
    let pipeline = AnalysisPipeline::new(config.clone())?;
    Ok(pipeline.run(hits, providers))
}
