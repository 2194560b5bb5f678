use crate::document::Document;
use crate::spelling::Corrector;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r#""(.*?)""#).expect("valid regex");
    pub static ref DEFAULT_ABBREVIATIONS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("ai", "artificial intelligence"),
            ("ml", "machine learning"),
            ("nn", "neural network"),
            ("dl", "deep learning"),
            ("nlg", "natural language generation"),
            ("nlu", "natural language understanding"),
            ("cv", "computer vision"),
            ("nlp", "natural language processing"),
            ("qml", "quantum machine learning"),
            ("al", "active learning"),
            ("cybersec", "cybersecurity"),
            ("iot", "internet of things"),
            ("cloudsec", "cloud security"),
            ("cs", "computer science"),
            ("ds", "data science"),
            ("bd", "big data"),
        ];
        pairs.iter().copied().collect()
    };
}

/// Query-side rewriting: abbreviation expansion, then per-token spelling correction.
pub struct QueryRewriter {
    abbreviations: HashMap<String, String>,
    corrector: Box<dyn Corrector>,
}

impl QueryRewriter {
    pub fn new<I, K, V>(abbreviations: I, corrector: Box<dyn Corrector>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let abbreviations = abbreviations
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
            .collect();
        Self { abbreviations, corrector }
    }

    pub fn with_default_abbreviations(corrector: Box<dyn Corrector>) -> Self {
        Self::new(DEFAULT_ABBREVIATIONS.iter().map(|(k, v)| (*k, *v)), corrector)
    }

    /// Whole-token replacement; multi-word expansions are spliced in place.
    pub fn expand_abbreviations(&self, query: &str) -> String {
        query
            .split_whitespace()
            .map(|token| self.abbreviations.get(token).map(String::as_str).unwrap_or(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn correct_spelling(&self, query: &str) -> String {
        query
            .split_whitespace()
            .map(|token| self.corrector.correct(token).unwrap_or_else(|| token.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn rewrite(&self, query: &str) -> String {
        let expanded = self.expand_abbreviations(&query.to_lowercase());
        self.correct_spelling(&expanded)
    }
}

/// Every word an expansion in `abbreviations` can introduce.
pub fn expansion_words(abbreviations: &[(String, String)]) -> impl Iterator<Item = &str> + '_ {
    abbreviations.iter().flat_map(|(_, v)| v.split_whitespace())
}

/// Non-empty `"quoted"` substrings of `query`, in order.
pub fn extract_phrases(query: &str) -> Vec<String> {
    QUOTED
        .captures_iter(query)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Exact-phrase title filter, applied ahead of vector search only when a caller opts in.
pub struct PhraseFilter;

impl PhraseFilter {
    /// Positions of documents whose title contains the first phrase that matches anything.
    pub fn matching(docs: &[Document], phrases: &[String]) -> Option<Vec<usize>> {
        for phrase in phrases {
            let needle = phrase.to_lowercase();
            let hits: Vec<usize> = docs
                .iter()
                .enumerate()
                .filter(|(_, d)| d.title.to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect();
            if !hits.is_empty() {
                return Some(hits);
            }
        }
        None
    }
}
