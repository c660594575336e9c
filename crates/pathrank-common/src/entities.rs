/// Core records flowing through the pathway ranking stages.
/// Inputs arrive as `PathwayHit`s from the enrichment adapters; the
/// aggregator folds them into one `AggregatedPathway` per canonical id.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PathrankError;

// ---------------------------------------------------------------------------
// Source database
// ---------------------------------------------------------------------------

/// Annotation database a pathway hit was reported from.
///
/// Serialises as the snake_case name; deserialises through `FromStr`, so
/// every service label it accepts is accepted in input files too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SourceDb {
    /// Reactome-style curated signalling pathways.
    CuratedSignaling,
    /// KEGG-style metabolic/reference maps.
    MetabolicReference,
    /// WikiPathways-style community curation.
    CommunityCurated,
    /// Gene Ontology terms.
    Ontology,
}

impl SourceDb {
    pub const ALL: [SourceDb; 4] = [
        SourceDb::CuratedSignaling,
        SourceDb::MetabolicReference,
        SourceDb::CommunityCurated,
        SourceDb::Ontology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceDb::CuratedSignaling => "curated_signaling",
            SourceDb::MetabolicReference => "metabolic_reference",
            SourceDb::CommunityCurated => "community_curated",
            SourceDb::Ontology => "ontology",
        }
    }
}

impl fmt::Display for SourceDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceDb {
    type Err = PathrankError;

    /// Accepts the canonical snake_case names as well as the labels the
    /// enrichment services use (`KEGG`, `Reactome`, `GO:BP`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "curated_signaling" | "reactome" | "rea" => Ok(SourceDb::CuratedSignaling),
            "metabolic_reference" | "kegg" => Ok(SourceDb::MetabolicReference),
            "community_curated" | "wikipathways" | "wp" => Ok(SourceDb::CommunityCurated),
            "ontology" | "go" | "go:bp" | "go:mf" | "go:cc" => Ok(SourceDb::Ontology),
            _ => Err(PathrankError::Other(anyhow::anyhow!(
                "unknown source database label: {s}"
            ))),
        }
    }
}

impl TryFrom<String> for SourceDb {
    type Error = PathrankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Discovery path
// ---------------------------------------------------------------------------

/// How a hit was discovered. Secondary hits carry their lineage; primary
/// hits carry nothing extra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoveryPath {
    /// Direct enrichment of the seed-gene neighbourhood.
    Primary,
    /// Enrichment of genes drawn from a primary pathway's evidence set.
    Secondary {
        origin_primary_pathway_id: String,
        #[serde(default)]
        contributing_seed_genes: BTreeSet<String>,
    },
}

impl DiscoveryPath {
    pub fn is_secondary(&self) -> bool {
        matches!(self, DiscoveryPath::Secondary { .. })
    }
}

// ---------------------------------------------------------------------------
// Pathway hit (input)
// ---------------------------------------------------------------------------

/// One pathway reported by one enrichment query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayHit {
    /// External database identifier; shared by hits for the same pathway.
    pub source_pathway_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source_db: SourceDb,
    /// `None` is the adapter's "statistic unavailable" marker.
    #[serde(default, deserialize_with = "lenient_statistic")]
    pub p_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_statistic")]
    pub p_adjusted: Option<f64>,
    pub evidence_genes: BTreeSet<String>,
    pub discovery_path: DiscoveryPath,
    /// Seeds whose neighbourhood produced a primary hit.
    #[serde(default)]
    pub seed_genes: BTreeSet<String>,
}

/// Reads a statistic that adapters may write as a number, a numeric
/// string, or a placeholder such as `"NA"`. Anything non-numeric becomes
/// `None` and is neutralised downstream.
fn lenient_statistic<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

impl PathwayHit {
    /// Seed genes reachable through this hit's discovery path.
    pub fn contributing_seeds(&self) -> &BTreeSet<String> {
        match &self.discovery_path {
            DiscoveryPath::Primary => &self.seed_genes,
            DiscoveryPath::Secondary { contributing_seed_genes, .. } => contributing_seed_genes,
        }
    }

    /// The p-value if it is a usable probability in (0, 1].
    pub fn usable_p_value(&self) -> Option<f64> {
        self.p_value.filter(|p| p.is_finite() && *p > 0.0 && *p <= 1.0)
    }
}

/// A raw secondary hit kept on the aggregated record for lineage display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryInstance {
    pub origin_primary_pathway_id: String,
    pub p_value: f64,
    pub p_adjusted: Option<f64>,
    pub evidence_genes: BTreeSet<String>,
    pub contributing_seed_genes: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Aggregated pathway
// ---------------------------------------------------------------------------

/// All hits sharing one canonical pathway id, merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPathway {
    pub canonical_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source_db: SourceDb,
    pub evidence_genes: BTreeSet<String>,
    pub support_count: usize,
    pub source_primary_pathway_ids: BTreeSet<String>,
    pub source_secondary_instances: Vec<SecondaryInstance>,
    pub combined_p_value: f64,
    pub best_p_adjusted: Option<f64>,
    pub aggregation_score: f64,
    pub consistency_score: f64,
    pub confidence_score: f64,
    pub contributing_seed_genes: BTreeSet<String>,
    /// Per-hit p-values in merge order, after neutral substitution.
    pub hit_p_values: Vec<f64>,
    /// Hits whose statistic was missing or unusable.
    #[serde(default)]
    pub unusable_statistics: usize,
}

impl AggregatedPathway {
    pub fn gene_count(&self) -> usize {
        self.evidence_genes.len()
    }

    /// True when any secondary discovery path contributed.
    pub fn has_secondary_support(&self) -> bool {
        !self.source_secondary_instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_db_parses_service_labels() {
        assert_eq!("KEGG".parse::<SourceDb>().unwrap(), SourceDb::MetabolicReference);
        assert_eq!("Reactome".parse::<SourceDb>().unwrap(), SourceDb::CuratedSignaling);
        assert_eq!("GO:BP".parse::<SourceDb>().unwrap(), SourceDb::Ontology);
        assert_eq!("WikiPathways".parse::<SourceDb>().unwrap(), SourceDb::CommunityCurated);
        assert!("msigdb".parse::<SourceDb>().is_err());
    }

    #[test]
    fn test_source_db_accepts_service_labels_in_json() {
        for (label, expected) in [
            ("GO:BP", SourceDb::Ontology),
            ("GO:MF", SourceDb::Ontology),
            ("REA", SourceDb::CuratedSignaling),
            ("WP", SourceDb::CommunityCurated),
            ("KEGG", SourceDb::MetabolicReference),
            ("metabolic_reference", SourceDb::MetabolicReference),
        ] {
            let db: SourceDb = serde_json::from_value(serde_json::json!(label)).unwrap();
            assert_eq!(db, expected, "label {label}");
        }
        assert!(serde_json::from_value::<SourceDb>(serde_json::json!("msigdb")).is_err());
        assert_eq!(serde_json::to_value(SourceDb::Ontology).unwrap(), "ontology");
    }

    #[test]
    fn test_non_numeric_statistics_read_as_missing() {
        let hit: PathwayHit = serde_json::from_value(serde_json::json!({
            "source_pathway_id": "hsa04260",
            "name": "cardiac muscle contraction",
            "source_db": "KEGG",
            "p_value": "NA",
            "p_adjusted": "0.004",
            "evidence_genes": ["MYH6"],
            "discovery_path": { "kind": "primary" }
        }))
        .unwrap();
        assert_eq!(hit.p_value, None);
        assert_eq!(hit.p_adjusted, Some(0.004));

        let hit: PathwayHit = serde_json::from_value(serde_json::json!({
            "source_pathway_id": "hsa04260",
            "name": "cardiac muscle contraction",
            "source_db": "KEGG",
            "p_value": null,
            "evidence_genes": ["MYH6"],
            "discovery_path": { "kind": "primary" }
        }))
        .unwrap();
        assert_eq!(hit.p_value, None);
    }

    #[test]
    fn test_discovery_path_is_tagged_in_json() {
        let hit: PathwayHit = serde_json::from_value(serde_json::json!({
            "source_pathway_id": "GO:0007507",
            "name": "heart development",
            "source_db": "ontology",
            "p_value": 1e-6,
            "evidence_genes": ["GATA4", "TBX5"],
            "discovery_path": {
                "kind": "secondary",
                "origin_primary_pathway_id": "GO:0003007",
                "contributing_seed_genes": ["GATA4"]
            }
        }))
        .unwrap();

        assert!(hit.discovery_path.is_secondary());
        assert!(hit.contributing_seeds().contains("GATA4"));
        assert!(hit.description.is_none());
    }

    #[test]
    fn test_unusable_p_values_are_rejected() {
        let mut hit: PathwayHit = serde_json::from_value(serde_json::json!({
            "source_pathway_id": "R-HSA-1",
            "name": "cardiac conduction",
            "source_db": "reactome",
            "evidence_genes": ["SCN5A"],
            "discovery_path": { "kind": "primary" }
        }))
        .unwrap();
        assert_eq!(hit.usable_p_value(), None);

        hit.p_value = Some(f64::NAN);
        assert_eq!(hit.usable_p_value(), None);
        hit.p_value = Some(0.0);
        assert_eq!(hit.usable_p_value(), None);
        hit.p_value = Some(1.5);
        assert_eq!(hit.usable_p_value(), None);
        hit.p_value = Some(0.01);
        assert_eq!(hit.usable_p_value(), Some(0.01));
    }
}
