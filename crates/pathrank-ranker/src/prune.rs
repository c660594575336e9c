//! Redundancy pruning: collapse pathways with near-identical gene sets.
//!
//! Candidates are visited strongest-first (support, then gene count, then
//! id) and greedily accepted unless their gene set is too similar to one
//! already accepted. The survivor of a near-duplicate cluster is therefore
//! the best-supported member, not whichever was discovered first.

use std::collections::BTreeMap;

use pathrank_common::{AggregatedPathway, PruneConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::normalise::jaccard;

/// A pathway dropped as redundant. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupersededPathway {
    pub canonical_id: String,
    pub name: String,
    pub superseded_by: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PruneOutcome {
    /// Accepted pathways, in visiting order.
    pub retained: Vec<AggregatedPathway>,
    pub superseded: Vec<SupersededPathway>,
}

/// Visiting order: descending support, descending gene count, ascending id.
fn prune_order(a: &AggregatedPathway, b: &AggregatedPathway) -> std::cmp::Ordering {
    b.support_count
        .cmp(&a.support_count)
        .then_with(|| b.gene_count().cmp(&a.gene_count()))
        .then_with(|| a.canonical_id.cmp(&b.canonical_id))
}

pub fn prune_redundant(
    aggregated: &BTreeMap<String, AggregatedPathway>,
    config: &PruneConfig,
) -> PruneOutcome {
    let mut candidates: Vec<&AggregatedPathway> = aggregated.values().collect();
    candidates.sort_by(|a, b| prune_order(a, b));

    let mut outcome = PruneOutcome::default();

    for candidate in candidates {
        let collision = outcome.retained.iter().find_map(|kept| {
            let similarity = jaccard(&candidate.evidence_genes, &kept.evidence_genes);
            (similarity >= config.jaccard_threshold).then_some((kept, similarity))
        });

        match collision {
            Some((kept, similarity)) => {
                debug!(
                    pathway = %candidate.canonical_id,
                    superseded_by = %kept.canonical_id,
                    similarity,
                    "Pruning redundant pathway"
                );
                outcome.superseded.push(SupersededPathway {
                    canonical_id: candidate.canonical_id.clone(),
                    name: candidate.name.clone(),
                    superseded_by: kept.canonical_id.clone(),
                    similarity,
                });
            }
            None => outcome.retained.push(candidate.clone()),
        }
    }

    info!(
        candidates = aggregated.len(),
        retained = outcome.retained.len(),
        superseded = outcome.superseded.len(),
        "Redundancy pruning complete"
    );
    outcome
}
