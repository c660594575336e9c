//! Trait for tissue-specificity evidence.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

/// Trait for accessing a target-tissue specificity ratio for a gene set
/// (target-tissue expression over background expression).
pub trait TissueSpecificityProvider: Send + Sync {
    /// Returns None when no gene in the set has expression data.
    fn specificity_ratio(&self, genes: &BTreeSet<String>) -> Option<f64>;
}

// ── Per-gene ratio table ───────────────────────────────────────────────────

/// Per-gene specificity ratios; a set's ratio is the mean over its genes
/// that have data.
#[derive(Debug, Clone, Default)]
pub struct GeneRatioTissueProvider {
    ratios: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RatioRow {
    gene: String,
    ratio: f64,
}

impl GeneRatioTissueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, gene: &str, ratio: f64) -> Self {
        self.ratios.insert(gene.to_string(), ratio);
        self
    }

    /// Load a `gene,ratio` CSV exported by the expression service.
    /// Rows with a non-finite or negative ratio are skipped.
    pub fn from_csv(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut ratios = HashMap::new();
        for row in reader.deserialize::<RatioRow>() {
            let row = row?;
            if row.ratio.is_finite() && row.ratio >= 0.0 {
                ratios.insert(row.gene.trim().to_string(), row.ratio);
            }
        }
        tracing::debug!(genes = ratios.len(), "Loaded tissue specificity ratios");
        Ok(Self { ratios })
    }
}

impl TissueSpecificityProvider for GeneRatioTissueProvider {
    fn specificity_ratio(&self, genes: &BTreeSet<String>) -> Option<f64> {
        let known: Vec<f64> = genes.iter().filter_map(|g| self.ratios.get(g).copied()).collect();
        if known.is_empty() {
            return None;
        }
        Some(known.iter().sum::<f64>() / known.len() as f64)
    }
}
