//! Curated domain term lexicon used by the relevance filter.
//!
//! Terms are plain words or phrases; matching is case-insensitive on word
//! boundaries and is done by the ranker, which compiles a lexicon once per
//! analysis run.

use serde::{Deserialize, Serialize};

/// Term categories, in the order the relevance breakdown reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    Direct,
    Process,
    Pathology,
    DiseaseContext,
    Negative,
}

impl TermCategory {
    pub const ALL: [TermCategory; 5] = [
        TermCategory::Direct,
        TermCategory::Process,
        TermCategory::Pathology,
        TermCategory::DiseaseContext,
        TermCategory::Negative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermCategory::Direct => "direct_terms",
            TermCategory::Process => "process_terms",
            TermCategory::Pathology => "pathology_terms",
            TermCategory::DiseaseContext => "disease_context_terms",
            TermCategory::Negative => "negative_terms",
        }
    }
}

/// Curated term lexicon partitioned into categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermLexicon {
    /// Literal on-topic subjects; the inclusion gate requires one of these
    /// in the pathway name.
    #[serde(default)]
    pub direct_terms: Vec<String>,
    #[serde(default)]
    pub process_terms: Vec<String>,
    #[serde(default)]
    pub pathology_terms: Vec<String>,
    #[serde(default)]
    pub disease_context_terms: Vec<String>,
    #[serde(default)]
    pub negative_terms: Vec<String>,
}

impl Default for TermLexicon {
    fn default() -> Self {
        Self::cardiovascular()
    }
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

impl TermLexicon {
    /// Cardiovascular lexicon shipped as the default calibration.
    pub fn cardiovascular() -> Self {
        Self {
            direct_terms: terms(&[
                "heart",
                "cardiac",
                "cardiomyocyte",
                "cardiomyopathy",
                "cardiovascular",
                "myocardial",
                "myocardium",
                "ventricular",
                "ventricle",
                "atrial",
                "atrium",
                "coronary",
                "aortic",
                "aorta",
                "vascular",
                "endothelial",
                "angiogenesis",
                "vasculogenesis",
                "blood pressure",
                "arrhythmia",
                "sarcomere",
            ]),
            process_terms: terms(&[
                "development",
                "morphogenesis",
                "differentiation",
                "contraction",
                "conduction",
                "signaling",
                "signalling",
                "remodeling",
                "hypertrophy",
                "proliferation",
                "apoptosis",
                "calcium",
                "muscle",
            ]),
            pathology_terms: terms(&[
                "fibrosis",
                "failure",
                "infarction",
                "ischemia",
                "atherosclerosis",
                "stenosis",
                "inflammation",
                "dysfunction",
                "disease",
            ]),
            disease_context_terms: terms(&[
                "heart failure",
                "cardiomyopathy",
                "myocardial infarction",
                "arrhythmia",
                "atrial fibrillation",
                "hypertension",
                "coronary artery disease",
                "congenital heart disease",
            ]),
            negative_terms: terms(&[
                "cancer",
                "carcinoma",
                "tumor",
                "leukemia",
                "lymphoma",
                "viral",
                "infection",
                "olfactory",
                "spermatogenesis",
            ]),
        }
    }

    pub fn terms(&self, category: TermCategory) -> &[String] {
        match category {
            TermCategory::Direct => &self.direct_terms,
            TermCategory::Process => &self.process_terms,
            TermCategory::Pathology => &self.pathology_terms,
            TermCategory::DiseaseContext => &self.disease_context_terms,
            TermCategory::Negative => &self.negative_terms,
        }
    }

    /// Load a lexicon from a YAML file.
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let lexicon: Self = serde_yaml::from_str(&content)?;
        Ok(lexicon)
    }

    /// Total number of terms across all categories.
    pub fn len(&self) -> usize {
        TermCategory::ALL.iter().map(|c| self.terms(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
