//! Pathway aggregation, relevance filtering and scoring engine.
//!
//! Stages run strictly in order, each a pure function of its input and the
//! run's `AnalysisConfig`:
//! intake → aggregate → prune → relevance gate → score → important genes.

pub mod ingest;
pub mod normalise;
pub mod aggregate;
pub mod prune;
pub mod lexicon;
pub mod relevance;
pub mod lineage;
pub mod scorer;
pub mod genes;
pub mod pipeline;
pub mod tissue_provider;
pub mod literature_provider;
pub mod domain_provider;

pub use aggregate::aggregate_hits;
pub use ingest::{load_hits_json, LoadedHits, RejectedHit};
pub use genes::{rank_important_genes, ImportantGene};
pub use lineage::{DiscoveryMethod, Lineage};
pub use pipeline::{run_analysis, AnalysisOutcome, AnalysisPipeline, AnalysisProviders, AnalysisReport, RunStats};
pub use prune::{prune_redundant, PruneOutcome};
pub use relevance::{FilterOutcome, RelevanceAnnotation, RelevanceFilter};
pub use scorer::{score_pathways, AuxiliaryEvidence, ScoredHypothesis};
