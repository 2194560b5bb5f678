use crate::config::EngineConfig;
use crate::document::{Article, Corpus, Document};
use crate::error::{RetrievalError, RetrievalResult};
use crate::index::LexiconIndex;
use crate::rank::{rank, rank_candidates, sort_ranked, RankedResult};
use crate::rewrite::{expansion_words, extract_phrases, PhraseFilter, QueryRewriter, DEFAULT_ABBREVIATIONS};
use crate::spelling::{Corrector, FrequencyCorrector};
use crate::tokenizer::Normalizer;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Public result record, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub total_words: u32,
    pub unique_words_norm: f32,
    pub stopwords_norm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHit {
    #[serde(flatten)]
    pub result: SearchResult,
    pub topic: String,
    pub similarity: f32,
    pub adjusted_score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalPath {
    /// Content index alone was strong enough.
    Content,
    /// Content results were too few or too weak; title results were merged in.
    ContentAndTitle,
    /// A quoted phrase matched titles and vector scoring was skipped.
    Phrase,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchTrace {
    pub query: String,
    pub rewritten_query: String,
    pub path: RetrievalPath,
    pub hits: Vec<ScoredHit>,
}

impl SearchTrace {
    pub fn fallback_used(&self) -> bool { self.path == RetrievalPath::ContentAndTitle }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.hits.into_iter().map(|h| h.result).collect()
    }
}

/// Retrieval coordinator over an immutable corpus and its two lexicon indexes.
///
/// Everything is built in [`EngineBuilder::build`]; afterwards every query is a pure
/// read, so one engine can be shared across threads without locking.
pub struct SearchEngine {
    corpus: Corpus,
    title_index: LexiconIndex,
    content_index: LexiconIndex,
    rewriter: QueryRewriter,
    config: EngineConfig,
}

pub struct EngineBuilder {
    articles: Vec<Article>,
    config: EngineConfig,
    stopwords: Option<Vec<String>>,
    abbreviations: Option<Vec<(String, String)>>,
    corrector: Option<Box<dyn Corrector>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = Some(words.into_iter().map(Into::into).collect());
        self
    }

    pub fn abbreviations<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.abbreviations = Some(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Replace the corpus-trained corrector.
    pub fn corrector(mut self, corrector: Box<dyn Corrector>) -> Self {
        self.corrector = Some(corrector);
        self
    }

    pub fn build(self) -> RetrievalResult<SearchEngine> {
        self.config.validate()?;
        let normalizer = Arc::new(match &self.stopwords {
            Some(words) => Normalizer::new(words),
            None => Normalizer::default(),
        });
        let corpus = Corpus::build(self.articles, &normalizer)?;

        let weighting = self.config.query_weighting;
        let title_index = LexiconIndex::build(corpus.documents(), |d| d.processed_title.as_str(), normalizer.clone(), weighting);
        let content_index = LexiconIndex::build(corpus.documents(), |d| d.combined_text.as_str(), normalizer.clone(), weighting);

        let abbreviations = self.abbreviations.unwrap_or_else(|| {
            DEFAULT_ABBREVIATIONS.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
        });
        let corrector = match self.corrector {
            Some(c) => c,
            None => {
                let mut c = FrequencyCorrector::new(self.config.max_edit_distance);
                for doc in corpus.documents() {
                    c.add_text(&doc.combined_text);
                }
                c.add_known(normalizer.stopwords());
                c.add_known(expansion_words(&abbreviations));
                if c.is_empty() {
                    tracing::warn!("spelling dictionary is empty, queries will not be corrected");
                }
                tracing::debug!(known_words = c.len(), "spelling dictionary trained");
                Box::new(c)
            }
        };
        let rewriter = QueryRewriter::new(abbreviations, corrector);

        tracing::info!(
            num_docs = corpus.len(),
            title_terms = title_index.vocabulary_len(),
            content_terms = content_index.vocabulary_len(),
            "search engine ready"
        );
        Ok(SearchEngine { corpus, title_index, content_index, rewriter, config: self.config })
    }
}

impl SearchEngine {
    pub fn builder(articles: Vec<Article>) -> EngineBuilder {
        EngineBuilder { articles, config: EngineConfig::default(), stopwords: None, abbreviations: None, corrector: None }
    }

    /// Default dictionaries and a corrector trained on the corpus itself.
    pub fn new(articles: Vec<Article>, config: EngineConfig) -> RetrievalResult<Self> {
        Self::builder(articles).config(config).build()
    }

    pub fn corpus(&self) -> &Corpus { &self.corpus }
    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn title_index(&self) -> &LexiconIndex { &self.title_index }
    pub fn content_index(&self) -> &LexiconIndex { &self.content_index }
    pub fn rewriter(&self) -> &QueryRewriter { &self.rewriter }

    /// Top results for `query`: at most `result_limit`, possibly fewer.
    pub fn search(&self, query: &str) -> RetrievalResult<Vec<SearchResult>> {
        Ok(self.search_traced(query)?.into_results())
    }

    /// Content index first, title index merged in when content results are too few or too weak.
    ///
    /// Does not consult the phrase filter; see [`SearchEngine::search_with_phrases`].
    pub fn search_traced(&self, query: &str) -> RetrievalResult<SearchTrace> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }
        let rewritten = self.rewriter.rewrite(query);
        let docs = self.corpus.documents();
        let limit = self.config.result_limit;

        let content_scores = self.content_index.score(&rewritten);
        let mut merged = rank(&content_scores, docs, &self.config.weights);
        let max_similarity = merged.iter().map(|r| r.similarity).fold(f32::NEG_INFINITY, f32::max);

        let path = if merged.len() < limit || max_similarity < self.config.fallback_threshold {
            let title_scores = self.title_index.score(&rewritten);
            merged.extend(rank(&title_scores, docs, &self.config.weights));
            RetrievalPath::ContentAndTitle
        } else {
            RetrievalPath::Content
        };
        tracing::debug!(query, rewritten = %rewritten, max_similarity, ?path, "scored query");

        let hits = self.finalize(merged);
        Ok(SearchTrace { query: query.to_string(), rewritten_query: rewritten, path, hits })
    }

    /// Like [`SearchEngine::search_traced`], but a quoted phrase that matches any title
    /// short-circuits retrieval to those documents, ranked by quality features alone.
    pub fn search_with_phrases(&self, query: &str) -> RetrievalResult<SearchTrace> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }
        let phrases = extract_phrases(trimmed);
        let Some(positions) = PhraseFilter::matching(self.corpus.documents(), &phrases) else {
            return self.search_traced(trimmed);
        };
        tracing::debug!(query = trimmed, matches = positions.len(), "phrase filter matched");
        let ranked = rank_candidates(positions.into_iter().map(|p| (p, 0.0)), self.corpus.documents(), &self.config.weights);
        Ok(SearchTrace {
            query: trimmed.to_string(),
            rewritten_query: trimmed.to_string(),
            path: RetrievalPath::Phrase,
            hits: self.finalize(ranked),
        })
    }

    /// Drop later duplicates by link, re-sort, truncate.
    fn finalize(&self, merged: Vec<RankedResult>) -> Vec<ScoredHit> {
        let docs = self.corpus.documents();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique: Vec<RankedResult> = merged
            .into_iter()
            .filter(|r| seen.insert(docs[r.position].link.as_str()))
            .collect();
        sort_ranked(&mut unique);
        unique.truncate(self.config.result_limit);
        unique.into_iter().map(|r| hit(&docs[r.position], &r)).collect()
    }
}

fn hit(doc: &Document, r: &RankedResult) -> ScoredHit {
    ScoredHit {
        result: SearchResult {
            title: doc.title.clone(),
            link: doc.link.clone(),
            total_words: doc.total_words,
            unique_words_norm: doc.features.unique_words_norm,
            stopwords_norm: doc.features.stopwords_norm,
        },
        topic: doc.topic.clone(),
        similarity: r.similarity,
        adjusted_score: r.adjusted_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::NoCorrection;

    fn article(title: &str, content: &str, link: &str, total_words: u32) -> Article {
        Article {
            topic: "t".into(),
            title: title.into(),
            content: content.into(),
            link: link.into(),
            total_words,
            unique_words_percentage: 50.0,
            stopwords_percentage: 20.0,
        }
    }

    fn six_docs() -> Vec<Article> {
        vec![
            article("Rust ownership", "borrow checker lifetimes ownership rust", "a", 100),
            article("Gardening", "tomatoes soil compost", "b", 100),
            article("Rust async", "futures executors rust tokio", "c", 100),
            article("Baking", "bread flour yeast", "d", 100),
            article("Astronomy", "stars galaxies telescopes", "e", 100),
            article("Chess", "openings endgames tactics", "f", 100),
        ]
    }

    #[test]
    fn strong_content_match_skips_title_fallback() {
        let engine = SearchEngine::builder(six_docs()).corrector(Box::new(NoCorrection)).build().unwrap();
        let trace = engine.search_traced("rust ownership").unwrap();
        assert_eq!(trace.path, RetrievalPath::Content);
        assert_eq!(trace.hits.len(), 5);
        assert_eq!(trace.hits[0].result.link, "a");
        assert!(trace.hits[0].similarity > trace.hits[1].similarity);
    }

    #[test]
    fn weak_content_match_merges_title_results_without_duplicates() {
        let engine = SearchEngine::builder(six_docs()).corrector(Box::new(NoCorrection)).build().unwrap();
        let trace = engine.search_traced("quasar").unwrap();
        assert!(trace.fallback_used());
        assert_eq!(trace.hits.len(), 5);
        let links: HashSet<&str> = trace.hits.iter().map(|h| h.result.link.as_str()).collect();
        assert_eq!(links.len(), 5);
    }

    #[test]
    fn small_corpus_always_falls_back_and_returns_what_exists() {
        let engine = SearchEngine::new(six_docs().into_iter().take(2).collect(), EngineConfig::default()).unwrap();
        let trace = engine.search_traced("rust").unwrap();
        assert!(trace.fallback_used());
        assert_eq!(trace.hits.len(), 2);
    }

    #[test]
    fn empty_query_is_rejected() {
        let engine = SearchEngine::new(six_docs(), EngineConfig::default()).unwrap();
        assert_eq!(engine.search("").unwrap_err(), RetrievalError::EmptyQuery);
        assert_eq!(engine.search(" \t ").unwrap_err(), RetrievalError::EmptyQuery);
    }

    #[test]
    fn invalid_config_fails_the_build() {
        let cfg = EngineConfig { result_limit: 0, ..EngineConfig::default() };
        assert!(matches!(SearchEngine::new(six_docs(), cfg), Err(RetrievalError::InvalidConfig(_))));
    }

    #[test]
    fn phrase_filter_is_opt_in() {
        let engine = SearchEngine::new(six_docs(), EngineConfig::default()).unwrap();
        let trace = engine.search_with_phrases(r#""rust async" tokio"#).unwrap();
        assert_eq!(trace.path, RetrievalPath::Phrase);
        assert_eq!(trace.hits.len(), 1);
        assert_eq!(trace.hits[0].result.link, "c");

        let trace = engine.search_traced(r#""rust async" tokio"#).unwrap();
        assert_ne!(trace.path, RetrievalPath::Phrase);

        let trace = engine.search_with_phrases(r#""no such title" rust"#).unwrap();
        assert_ne!(trace.path, RetrievalPath::Phrase);
    }

    #[test]
    fn result_limit_is_configurable() {
        let cfg = EngineConfig { result_limit: 2, ..EngineConfig::default() };
        let engine = SearchEngine::new(six_docs(), cfg).unwrap();
        assert_eq!(engine.search("rust").unwrap().len(), 2);
    }
}
