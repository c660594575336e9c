//! Lineage-aware aggregation of pathway hits.
//!
//! Hits sharing a `source_pathway_id` are merged into one
//! `AggregatedPathway`: gene evidence and seed genes are unioned, every
//! primary origin is recorded, secondary hits are retained for lineage,
//! and p-values are combined with Fisher's method so that independent
//! rediscovery through unrelated paths counts as replication.

use std::collections::BTreeMap;

use pathrank_common::confidence::{
    aggregate_confidence, compute_confidence, hit_confidence, ConfidenceModifiers,
};
use pathrank_common::{
    AggregatedPathway, AggregationConfig, DiscoveryPath, PathwayHit, SecondaryInstance,
};
use tracing::{debug, info};

use crate::normalise::{fisher_combine, neg_log10, normalized_stddev};

/// p-value assigned to hits whose statistic is missing or unusable.
pub const NEUTRAL_P_VALUE: f64 = 1.0;

/// Replication-aware evidence strength: -log10(p) × (1 + ln k).
pub fn aggregation_score(combined_p_value: f64, support_count: usize, floor: f64) -> f64 {
    let k = support_count.max(1) as f64;
    neg_log10(combined_p_value, floor) * (1.0 + k.ln())
}

/// Running state for one canonical id while hits are folded in.
struct PathwayAccumulator<'a> {
    hits: Vec<&'a PathwayHit>,
    record: AggregatedPathway,
}

impl<'a> PathwayAccumulator<'a> {
    fn new(hit: &'a PathwayHit) -> Self {
        Self {
            hits: Vec::new(),
            record: AggregatedPathway {
                canonical_id: hit.source_pathway_id.clone(),
                name: hit.name.clone(),
                description: hit.description.clone(),
                source_db: hit.source_db,
                evidence_genes: Default::default(),
                support_count: 0,
                source_primary_pathway_ids: Default::default(),
                source_secondary_instances: Vec::new(),
                combined_p_value: NEUTRAL_P_VALUE,
                best_p_adjusted: None,
                aggregation_score: 0.0,
                consistency_score: 1.0,
                confidence_score: 0.0,
                contributing_seed_genes: Default::default(),
                hit_p_values: Vec::new(),
                unusable_statistics: 0,
            },
        }
    }

    fn merge(&mut self, hit: &'a PathwayHit) {
        let p_value = match hit.usable_p_value() {
            Some(p) => p,
            None => {
                debug!(
                    pathway = %hit.source_pathway_id,
                    raw = ?hit.p_value,
                    "Unusable p-value, substituting neutral value"
                );
                self.record.unusable_statistics += 1;
                NEUTRAL_P_VALUE
            }
        };

        let record = &mut self.record;
        record.evidence_genes.extend(hit.evidence_genes.iter().cloned());
        record
            .contributing_seed_genes
            .extend(hit.contributing_seeds().iter().cloned());
        record.hit_p_values.push(p_value);
        record.support_count += 1;

        if record.description.is_none() {
            record.description = hit.description.clone();
        }

        if let Some(adj) = hit.p_adjusted.filter(|p| p.is_finite() && *p > 0.0) {
            record.best_p_adjusted = Some(match record.best_p_adjusted {
                Some(best) => best.min(adj),
                None => adj,
            });
        }

        match &hit.discovery_path {
            DiscoveryPath::Primary => {
                record
                    .source_primary_pathway_ids
                    .insert(hit.source_pathway_id.clone());
            }
            DiscoveryPath::Secondary {
                origin_primary_pathway_id,
                contributing_seed_genes,
            } => {
                record
                    .source_primary_pathway_ids
                    .insert(origin_primary_pathway_id.clone());
                record.source_secondary_instances.push(SecondaryInstance {
                    origin_primary_pathway_id: origin_primary_pathway_id.clone(),
                    p_value,
                    p_adjusted: hit.p_adjusted,
                    evidence_genes: hit.evidence_genes.clone(),
                    contributing_seed_genes: contributing_seed_genes.clone(),
                });
            }
        }

        self.hits.push(hit);
    }

    fn finish(self, config: &AggregationConfig) -> AggregatedPathway {
        let mut record = self.record;
        let p_values = &record.hit_p_values;

        record.combined_p_value = fisher_combine(p_values, config.p_value_floor);
        record.consistency_score = (1.0 - normalized_stddev(p_values)).clamp(0.0, 1.0);
        record.aggregation_score =
            aggregation_score(record.combined_p_value, record.support_count, config.p_value_floor);

        let per_hit: Vec<f64> = p_values.iter().map(|&p| hit_confidence(p)).collect();
        let mods = ConfidenceModifiers {
            support_count: record.support_count,
            seed_gene_count: record.contributing_seed_genes.len(),
            unusable_statistics: record.unusable_statistics,
        };
        record.confidence_score = compute_confidence(aggregate_confidence(&per_hit), &mods);

        record
    }
}

/// Bitwise equality for statistics, so a repeated NaN matches itself.
fn same_statistic(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y).is_eq(),
        (None, None) => true,
        _ => false,
    }
}

/// The same hit delivered again. Differs from `PartialEq` only in how
/// non-finite statistics compare.
fn same_delivery(a: &PathwayHit, b: &PathwayHit) -> bool {
    same_statistic(a.p_value, b.p_value)
        && same_statistic(a.p_adjusted, b.p_adjusted)
        && a.source_pathway_id == b.source_pathway_id
        && a.name == b.name
        && a.description == b.description
        && a.source_db == b.source_db
        && a.evidence_genes == b.evidence_genes
        && a.discovery_path == b.discovery_path
        && a.seed_genes == b.seed_genes
}

/// Merge hits into one record per canonical id.
///
/// The first hit seen for an id fixes its name and source database.
/// Merge order follows input order, so equal inputs give equal outputs.
pub fn aggregate_hits(
    hits: &[PathwayHit],
    config: &AggregationConfig,
) -> BTreeMap<String, AggregatedPathway> {
    let mut groups: BTreeMap<&str, PathwayAccumulator<'_>> = BTreeMap::new();
    let mut collapsed = 0usize;

    for hit in hits {
        let acc = groups
            .entry(hit.source_pathway_id.as_str())
            .or_insert_with(|| PathwayAccumulator::new(hit));

        // The same hit delivered twice is one piece of evidence, not two.
        if config.collapse_identical_hits && acc.hits.iter().any(|seen| same_delivery(seen, hit)) {
            debug!(pathway = %hit.source_pathway_id, "Collapsing repeated identical hit");
            collapsed += 1;
            continue;
        }
        acc.merge(hit);
    }

    let aggregated: BTreeMap<String, AggregatedPathway> = groups
        .into_iter()
        .map(|(id, acc)| (id.to_string(), acc.finish(config)))
        .collect();

    info!(
        hits = hits.len(),
        pathways = aggregated.len(),
        collapsed,
        "Aggregation complete"
    );
    aggregated
}
