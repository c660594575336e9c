//! Word-boundary term matching over a compiled `TermLexicon`.

use pathrank_common::{PathrankError, Result, TermCategory, TermLexicon};
use regex::Regex;

/// One term and its compiled case-insensitive word-boundary pattern.
#[derive(Debug, Clone)]
struct CompiledTerm {
    term: String,
    pattern: Regex,
}

impl CompiledTerm {
    fn new(term: &str) -> Result<Self> {
        let term = term.trim();
        // Whitespace inside a phrase matches any run of whitespace.
        let body = term
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        // \b only means something next to a word character.
        let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
        let lead = if is_word(term.chars().next()) { r"\b" } else { "" };
        let trail = if is_word(term.chars().last()) { r"\b" } else { "" };
        let pattern = Regex::new(&format!(r"(?i){lead}{body}{trail}"))
            .map_err(|e| PathrankError::Lexicon(format!("term '{term}': {e}")))?;
        Ok(Self {
            term: term.to_string(),
            pattern,
        })
    }
}

/// A lexicon compiled for matching. Built once per run and owned by the
/// relevance filter; nothing here is global.
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    direct: Vec<CompiledTerm>,
    process: Vec<CompiledTerm>,
    pathology: Vec<CompiledTerm>,
    disease_context: Vec<CompiledTerm>,
    negative: Vec<CompiledTerm>,
}

fn compile_all(terms: &[String]) -> Result<Vec<CompiledTerm>> {
    terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| CompiledTerm::new(t))
        .collect()
}

impl CompiledLexicon {
    pub fn compile(lexicon: &TermLexicon) -> Result<Self> {
        Ok(Self {
            direct: compile_all(&lexicon.direct_terms)?,
            process: compile_all(&lexicon.process_terms)?,
            pathology: compile_all(&lexicon.pathology_terms)?,
            disease_context: compile_all(&lexicon.disease_context_terms)?,
            negative: compile_all(&lexicon.negative_terms)?,
        })
    }

    fn category(&self, category: TermCategory) -> &[CompiledTerm] {
        match category {
            TermCategory::Direct => &self.direct,
            TermCategory::Process => &self.process,
            TermCategory::Pathology => &self.pathology,
            TermCategory::DiseaseContext => &self.disease_context,
            TermCategory::Negative => &self.negative,
        }
    }

    /// Distinct terms of `category` found in `text`, in lexicon order.
    pub fn matches(&self, category: TermCategory, text: &str) -> Vec<String> {
        self.category(category)
            .iter()
            .filter(|t| t.pattern.is_match(text))
            .map(|t| t.term.clone())
            .collect()
    }

    pub fn any_match(&self, category: TermCategory, text: &str) -> bool {
        self.category(category).iter().any(|t| t.pattern.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> CompiledLexicon {
        CompiledLexicon::compile(&TermLexicon::cardiovascular()).unwrap()
    }

    #[test]
    fn test_word_boundary_matching() {
        let lex = lexicon();
        assert!(lex.any_match(TermCategory::Direct, "Heart development"));
        assert!(lex.any_match(TermCategory::Direct, "regulation of cardiac muscle contraction"));
        // "heart" must not match inside another word
        assert!(!lex.any_match(TermCategory::Direct, "heartwood formation"));
        assert!(!lex.any_match(TermCategory::Direct, "phosphorylation"));
    }

    #[test]
    fn test_phrase_terms_tolerate_whitespace() {
        let lex = lexicon();
        let found = lex.matches(TermCategory::DiseaseContext, "Heart   Failure");
        assert_eq!(found, vec!["heart failure".to_string()]);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let custom = TermLexicon {
            direct_terms: vec!["Ca2+ signaling".to_string(), "NF-kB".to_string()],
            ..TermLexicon::cardiovascular()
        };
        let lex = CompiledLexicon::compile(&custom).unwrap();
        assert!(lex.any_match(TermCategory::Direct, "NF-kB activation"));
        assert!(!lex.any_match(TermCategory::Direct, "NFxkB activation"));
    }
}
