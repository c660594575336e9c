//! Shared records, errors and configuration used across the Pathrank crates.

pub mod error;
pub mod entities;
pub mod confidence;
pub mod lexicon;
pub mod analysis_config;

// Re-export commonly used types
pub use analysis_config::{
    AggregationConfig, AnalysisConfig, DbWeights, GeneRankConfig, PruneConfig, RelevanceConfig,
    RelevanceWeights, ScoringConfig,
};
pub use entities::{AggregatedPathway, DiscoveryPath, PathwayHit, SecondaryInstance, SourceDb};
pub use error::{PathrankError, Result};
pub use lexicon::{TermCategory, TermLexicon};
