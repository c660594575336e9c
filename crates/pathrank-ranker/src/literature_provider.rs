//! Trait for literature co-citation evidence.

use std::collections::{BTreeSet, HashMap};

/// Trait for accessing literature citation counts.
pub trait LiteratureProvider: Send + Sync {
    /// Number of publications mentioning the pathway together with any of
    /// the seed genes. None means no data, not zero citations.
    fn citation_count(&self, pathway_name: &str, seed_genes: &BTreeSet<String>) -> Option<u32>;
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Fixed counts keyed by lower-cased pathway name; seed genes are ignored.
pub struct MockLiteratureProvider {
    data: HashMap<String, u32>,
}

impl MockLiteratureProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with(mut self, pathway_name: &str, citations: u32) -> Self {
        self.data.insert(pathway_name.to_lowercase(), citations);
        self
    }
}

impl Default for MockLiteratureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LiteratureProvider for MockLiteratureProvider {
    fn citation_count(&self, pathway_name: &str, _seed_genes: &BTreeSet<String>) -> Option<u32> {
        self.data.get(&pathway_name.to_lowercase()).copied()
    }
}
