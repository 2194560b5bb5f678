use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref NON_ALPHA: Regex = Regex::new(r"[^a-zA-Z\s]").expect("valid regex");
    pub static ref DEFAULT_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","the","and","or","in","of","to","for","with","is",
            "on","at","as","by","this","that","it","if","from","but","are",
            "was","were","be","been","has","have","had","do","does","did",
            "will","would","shall","should","can","could","may","might","must",
        ];
        words.iter().copied().collect()
    };
}

/// Lowercases, strips everything outside `[a-zA-Z]` and whitespace, and drops stopwords.
///
/// The same normalizer is applied to document fields at build time and to queries
/// inside the lexicon index, so both sides share one vocabulary shape.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().copied())
    }
}

impl Normalizer {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        Self { stopwords }
    }

    pub fn is_stopword(&self, token: &str) -> bool { self.stopwords.contains(token) }

    pub fn stopwords(&self) -> impl Iterator<Item = &str> + '_ {
        self.stopwords.iter().map(String::as_str)
    }

    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = NON_ALPHA.replace_all(&lowered, "");
        stripped
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
