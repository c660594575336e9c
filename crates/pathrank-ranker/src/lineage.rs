//! Provenance view: seed genes → primary pathways → secondary instances → canonical pathway.

use std::collections::BTreeSet;

use pathrank_common::AggregatedPathway;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    /// Found once, by direct enrichment of the seed neighbourhood.
    Primary,
    /// Merged from several hits or reached through a secondary query.
    Aggregated,
}

/// One secondary discovery step, without its gene payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryLink {
    pub origin_primary_pathway_id: String,
    pub contributing_seed_genes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub seed_genes: BTreeSet<String>,
    pub primary_pathway_ids: BTreeSet<String>,
    pub secondary_instances: Vec<SecondaryLink>,
    pub canonical_id: String,
    pub discovery_method: DiscoveryMethod,
}

impl Lineage {
    pub fn of(pathway: &AggregatedPathway) -> Self {
        let discovery_method = if pathway.support_count > 1 || pathway.has_secondary_support() {
            DiscoveryMethod::Aggregated
        } else {
            DiscoveryMethod::Primary
        };

        Self {
            seed_genes: pathway.contributing_seed_genes.clone(),
            primary_pathway_ids: pathway.source_primary_pathway_ids.clone(),
            secondary_instances: pathway
                .source_secondary_instances
                .iter()
                .map(|s| SecondaryLink {
                    origin_primary_pathway_id: s.origin_primary_pathway_id.clone(),
                    contributing_seed_genes: s.contributing_seed_genes.clone(),
                })
                .collect(),
            canonical_id: pathway.canonical_id.clone(),
            discovery_method,
        }
    }
}
