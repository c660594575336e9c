//! Trait for curated disease-gene weights.
//!
//! Provides an abstraction over curated disease-gene tables, allowing the
//! important-gene ranker to weight genes without knowing where the
//! curation comes from.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Trait for accessing curated domain scores.
///
/// Implementations can use:
/// - a curated CSV table (local)
/// - an in-memory map (configuration, tests)
pub trait DomainGeneProvider: Send + Sync {
    /// Curated score in [0, 1] for a gene symbol.
    ///
    /// Returns None if the gene is not curated; callers treat that as 0.
    fn domain_score(&self, gene: &str) -> Option<f64>;
}

/// Provider with no curation; every gene scores neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDomainScores;

impl DomainGeneProvider for NoDomainScores {
    fn domain_score(&self, _gene: &str) -> Option<f64> {
        None
    }
}

// ── Static table ───────────────────────────────────────────────────────────

/// In-memory curated table. Scores are clamped to [0, 1] on insert.
#[derive(Debug, Clone, Default)]
pub struct StaticDomainGeneProvider {
    scores: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    gene: String,
    score: f64,
}

impl StaticDomainGeneProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gene score.
    pub fn with(mut self, gene: &str, score: f64) -> Self {
        self.insert(gene, score);
        self
    }

    fn insert(&mut self, gene: &str, score: f64) {
        if score.is_finite() {
            self.scores.insert(gene.trim().to_string(), score.clamp(0.0, 1.0));
        }
    }

    pub fn from_map(map: HashMap<String, f64>) -> Self {
        let mut provider = Self::new();
        for (gene, score) in map {
            provider.insert(&gene, score);
        }
        provider
    }

    /// Load a `gene,score` CSV.
    pub fn from_csv(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut provider = Self::new();
        for row in reader.deserialize::<ScoreRow>() {
            let row = row?;
            provider.insert(&row.gene, row.score);
        }
        tracing::debug!(genes = provider.len(), "Loaded curated domain gene scores");
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl DomainGeneProvider for StaticDomainGeneProvider {
    fn domain_score(&self, gene: &str) -> Option<f64> {
        self.scores.get(gene).copied()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
