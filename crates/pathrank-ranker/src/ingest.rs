//! Intake checks on the hit stream produced by the enrichment adapters.
//!
//! A hit missing a required field is dropped with a logged reason and never
//! merged. Hits with an unusable statistic are kept; the aggregator
//! substitutes the neutral p-value for them.

use std::collections::BTreeSet;
use std::path::Path;

use pathrank_common::{DiscoveryPath, PathrankError, PathwayHit};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A dropped hit and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedHit {
    pub source_pathway_id: String,
    pub reason: String,
}

/// Accepted hits, in input order, plus the rejected ones.
#[derive(Debug, Clone, Default)]
pub struct IntakeOutcome {
    pub accepted: Vec<PathwayHit>,
    pub rejected: Vec<RejectedHit>,
    /// Accepted hits whose p-value is missing or unusable.
    pub unusable_statistics: usize,
}

fn clean_symbols(genes: &BTreeSet<String>) -> BTreeSet<String> {
    genes
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check one hit against the adapter contract. Gene symbols are trimmed
/// and blank symbols removed before the emptiness check.
pub fn check_hit(hit: PathwayHit) -> Result<PathwayHit, PathrankError> {
    let id = hit.source_pathway_id.trim().to_string();
    if id.is_empty() {
        return Err(PathrankError::malformed(
            format!("<unnamed: {}>", hit.name),
            "missing source_pathway_id",
        ));
    }
    if hit.name.trim().is_empty() {
        return Err(PathrankError::malformed(id, "missing name"));
    }

    let evidence_genes = clean_symbols(&hit.evidence_genes);
    if evidence_genes.is_empty() {
        return Err(PathrankError::malformed(id, "empty evidence_genes"));
    }

    let discovery_path = match hit.discovery_path {
        DiscoveryPath::Primary => DiscoveryPath::Primary,
        DiscoveryPath::Secondary {
            origin_primary_pathway_id,
            contributing_seed_genes,
        } => {
            let origin = origin_primary_pathway_id.trim().to_string();
            if origin.is_empty() {
                return Err(PathrankError::malformed(
                    id,
                    "secondary hit without origin_primary_pathway_id",
                ));
            }
            DiscoveryPath::Secondary {
                origin_primary_pathway_id: origin,
                contributing_seed_genes: clean_symbols(&contributing_seed_genes),
            }
        }
    };

    Ok(PathwayHit {
        source_pathway_id: id,
        name: hit.name.trim().to_string(),
        evidence_genes,
        discovery_path,
        seed_genes: clean_symbols(&hit.seed_genes),
        ..hit
    })
}

/// Validate a hit stream. Never fails; malformed hits are excluded.
pub fn validate_hits(hits: impl IntoIterator<Item = PathwayHit>) -> IntakeOutcome {
    let mut outcome = IntakeOutcome::default();

    for hit in hits {
        match check_hit(hit) {
            Ok(hit) => {
                if hit.usable_p_value().is_none() {
                    outcome.unusable_statistics += 1;
                }
                outcome.accepted.push(hit);
            }
            Err(PathrankError::MalformedHit { id, reason }) => {
                warn!(pathway = %id, %reason, "Dropping malformed pathway hit");
                outcome.rejected.push(RejectedHit {
                    source_pathway_id: id,
                    reason,
                });
            }
            Err(other) => {
                warn!(error = %other, "Dropping pathway hit");
                outcome.rejected.push(RejectedHit {
                    source_pathway_id: String::new(),
                    reason: other.to_string(),
                });
            }
        }
    }

    info!(
        accepted = outcome.accepted.len(),
        rejected = outcome.rejected.len(),
        unusable_statistics = outcome.unusable_statistics,
        "Hit intake complete"
    );
    outcome
}

/// Hits read from an adapter file, plus the records that could not be read.
#[derive(Debug, Clone, Default)]
pub struct LoadedHits {
    pub hits: Vec<PathwayHit>,
    pub rejected: Vec<RejectedHit>,
}

/// Read a JSON array of hits, as written by the enrichment adapters.
///
/// Each record is decoded on its own: a record that does not decode is
/// dropped with a logged reason and the rest of the file still loads. Only
/// an unreadable file or a top level that is not an array is an error.
pub fn load_hits_json(path: impl AsRef<Path>) -> anyhow::Result<LoadedHits> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&content)?;

    let mut loaded = LoadedHits::default();
    for (index, record) in records.into_iter().enumerate() {
        let id = record
            .get("source_pathway_id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("<record {index}>"));

        match serde_json::from_value::<PathwayHit>(record) {
            Ok(hit) => loaded.hits.push(hit),
            Err(e) => {
                warn!(pathway = %id, error = %e, "Dropping unreadable pathway hit");
                loaded.rejected.push(RejectedHit {
                    source_pathway_id: id,
                    reason: format!("unreadable record: {e}"),
                });
            }
        }
    }

    info!(
        path = %path.display(),
        hits = loaded.hits.len(),
        rejected = loaded.rejected.len(),
        "Loaded pathway hits"
    );
    Ok(loaded)
}
