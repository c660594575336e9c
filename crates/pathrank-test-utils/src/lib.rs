//! Shared fixtures for Pathrank tests: hit builders, seeded random hit
//! streams, and a tracing subscriber for test output.

use std::collections::BTreeSet;
use std::sync::Once;

use pathrank_common::{DiscoveryPath, PathwayHit, SourceDb};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

pub use pretty_assertions::{assert_eq, assert_ne};

static TRACING: Once = Once::new();

/// Install a test subscriber once per process. Honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("pathrank=debug,warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn symbols(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// `n` synthetic gene symbols `{prefix}0 .. {prefix}{n-1}`.
pub fn gene_set(prefix: &str, n: usize) -> BTreeSet<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

/// Builder for `PathwayHit` fixtures.
#[derive(Debug, Clone)]
pub struct HitBuilder {
    hit: PathwayHit,
}

impl HitBuilder {
    pub fn primary(id: &str, name: &str) -> Self {
        Self {
            hit: PathwayHit {
                source_pathway_id: id.to_string(),
                name: name.to_string(),
                description: None,
                source_db: SourceDb::Ontology,
                p_value: Some(0.01),
                p_adjusted: Some(0.01),
                evidence_genes: BTreeSet::new(),
                discovery_path: DiscoveryPath::Primary,
                seed_genes: BTreeSet::new(),
            },
        }
    }

    pub fn secondary(id: &str, name: &str, origin_primary_pathway_id: &str) -> Self {
        let mut builder = Self::primary(id, name);
        builder.hit.discovery_path = DiscoveryPath::Secondary {
            origin_primary_pathway_id: origin_primary_pathway_id.to_string(),
            contributing_seed_genes: BTreeSet::new(),
        };
        builder
    }

    pub fn db(mut self, db: SourceDb) -> Self {
        self.hit.source_db = db;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.hit.description = Some(description.to_string());
        self
    }

    pub fn p_value(mut self, p: f64) -> Self {
        self.hit.p_value = Some(p);
        self
    }

    pub fn p_adjusted(mut self, p: f64) -> Self {
        self.hit.p_adjusted = Some(p);
        self
    }

    /// Mark the statistic as unavailable.
    pub fn no_p_value(mut self) -> Self {
        self.hit.p_value = None;
        self.hit.p_adjusted = None;
        self
    }

    pub fn genes(mut self, genes: &[&str]) -> Self {
        self.hit.evidence_genes = symbols(genes);
        self
    }

    pub fn gene_set(mut self, genes: BTreeSet<String>) -> Self {
        self.hit.evidence_genes = genes;
        self
    }

    /// Seed genes: `seed_genes` on a primary hit, contributing seeds on a
    /// secondary one.
    pub fn seeds(mut self, seeds: &[&str]) -> Self {
        match &mut self.hit.discovery_path {
            DiscoveryPath::Primary => self.hit.seed_genes = symbols(seeds),
            DiscoveryPath::Secondary { contributing_seed_genes, .. } => {
                *contributing_seed_genes = symbols(seeds)
            }
        }
        self
    }

    pub fn build(self) -> PathwayHit {
        self.hit
    }
}

/// The GATA4 / NKX2-5 heart development scenario: one primary hit and a
/// secondary rediscovery of the same GO term whose genes are a subset.
pub fn heart_development_hits() -> Vec<PathwayHit> {
    let genes = gene_set("CARD", 18)
        .into_iter()
        .chain(["GATA4".to_string(), "NKX2-5".to_string()])
        .collect::<BTreeSet<_>>();
    let subset: BTreeSet<String> = genes.iter().take(15).cloned().collect();

    vec![
        HitBuilder::primary("GO:0007507", "heart development")
            .p_value(1e-10)
            .p_adjusted(1e-10)
            .gene_set(genes)
            .seeds(&["GATA4", "NKX2-5"])
            .build(),
        HitBuilder::secondary("GO:0007507", "heart development", "GO:0007507")
            .p_value(1e-6)
            .p_adjusted(1e-6)
            .gene_set(subset)
            .seeds(&["NKX2-5"])
            .build(),
    ]
}

const NAMES: &[&str] = &[
    "heart development",
    "cardiac muscle contraction",
    "regulation of heart rate",
    "ventricular septum morphogenesis",
    "vascular smooth muscle contraction",
    "endothelial cell migration",
    "phosphorylation",
    "olfactory transduction",
    "MAPK signaling",
    "cardiomyocyte differentiation",
    "atrial cardiac muscle tissue development",
    "coronary vasculature development",
];

/// A reproducible mixed hit stream for property-style tests. Pathway ids
/// repeat so aggregation has real merging to do, gene sets overlap so the
/// pruner has real decisions to make.
pub fn random_hits(seed: u64, count: usize) -> Vec<PathwayHit> {
    let mut rng = StdRng::seed_from_u64(seed);
    let pool: Vec<String> = gene_set("G", 40).into_iter().collect();
    let dbs = SourceDb::ALL;

    (0..count)
        .map(|_| {
            let idx = rng.gen_range(0..NAMES.len());
            let id = format!("PW:{idx:03}");
            let size = rng.gen_range(3..15);
            let genes: BTreeSet<String> = pool.choose_multiple(&mut rng, size).cloned().collect();
            let p = 10f64.powf(-rng.gen_range(1.0..12.0));

            let builder = if rng.gen_bool(0.4) {
                let origin = format!("PW:{:03}", rng.gen_range(0..NAMES.len()));
                HitBuilder::secondary(&id, NAMES[idx], &origin).seeds(&["GATA4"])
            } else {
                HitBuilder::primary(&id, NAMES[idx]).seeds(&["GATA4", "NKX2-5"])
            };
            let builder = builder.db(dbs[idx % dbs.len()]).gene_set(genes);

            if rng.gen_bool(0.05) {
                builder.no_p_value().build()
            } else {
                builder.p_value(p).p_adjusted((p * 10.0).min(1.0)).build()
            }
        })
        .collect()
}

/// Serialise a value to compact JSON for byte-level comparisons.
pub fn to_json_bytes<T: serde::Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("fixture serialises")
}
