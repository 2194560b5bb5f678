use crate::document::Document;
use crate::tokenizer::Normalizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub type TermId = u32;
pub type DocId = u32;

/// Shortest token that becomes a vocabulary term.
pub const MIN_TERM_CHARS: usize = 2;

/// How query term counts are weighted before the cosine is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryWeighting {
    /// Raw term counts.
    #[default]
    RawTf,
    /// Term counts scaled by the index's idf, like the document rows.
    TfIdf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32, // l2-normalized tf-idf weight
}

/// TF-IDF vector space over one text field of every document.
///
/// Rows are stored sparsely as per-term postings sorted by `doc_id`. Immutable once built.
#[derive(Debug, Clone)]
pub struct LexiconIndex {
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    idf: Vec<f32>,
    postings: Vec<Vec<Posting>>, // indexed by term id
    num_docs: u32,
    normalizer: Arc<Normalizer>,
    weighting: QueryWeighting,
}

pub fn terms(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace().filter(|t| t.chars().count() >= MIN_TERM_CHARS)
}

impl LexiconIndex {
    /// Build over `field(doc)` for every document, in corpus order.
    pub fn build<F>(docs: &[Document], field: F, normalizer: Arc<Normalizer>, weighting: QueryWeighting) -> Self
    where
        F: Fn(&Document) -> &str,
    {
        let num_docs = docs.len() as u32;
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut raw: Vec<Vec<(DocId, u32)>> = Vec::new();

        for (doc_id, doc) in docs.iter().enumerate() {
            let mut tf_counts: BTreeMap<TermId, u32> = BTreeMap::new();
            for term in terms(field(doc)) {
                let next_id = dictionary.len() as TermId;
                let tid = *dictionary.entry(term.to_string()).or_insert_with(|| {
                    df.push(0);
                    raw.push(Vec::new());
                    next_id
                });
                *tf_counts.entry(tid).or_insert(0) += 1;
            }
            for (tid, tf) in tf_counts {
                df[tid as usize] += 1;
                raw[tid as usize].push((doc_id as DocId, tf));
            }
        }

        // smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n = num_docs as f32;
        let idf: Vec<f32> = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0).collect();

        let mut doc_norms: Vec<f32> = vec![0.0; docs.len()];
        for (tid, plist) in raw.iter().enumerate() {
            for &(doc_id, tf) in plist {
                let w = tf as f32 * idf[tid];
                doc_norms[doc_id as usize] += w * w;
            }
        }
        for dn in doc_norms.iter_mut() {
            *dn = dn.sqrt();
            if *dn == 0.0 { *dn = 1.0; }
        }

        let postings = raw
            .into_iter()
            .enumerate()
            .map(|(tid, plist)| {
                plist
                    .into_iter()
                    .map(|(doc_id, tf)| Posting { doc_id, weight: tf as f32 * idf[tid] / doc_norms[doc_id as usize] })
                    .collect()
            })
            .collect();

        tracing::debug!(num_docs, num_terms = dictionary.len(), "lexicon index built");
        Self { dictionary, df, idf, postings, num_docs, normalizer, weighting }
    }

    pub fn num_docs(&self) -> usize { self.num_docs as usize }

    pub fn vocabulary_len(&self) -> usize { self.dictionary.len() }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.term_id(term).map(|tid| self.df[tid as usize]).unwrap_or(0)
    }

    /// Cosine similarity of `query` against every document, in corpus order.
    ///
    /// The query is normalized the same way the documents were; out-of-vocabulary
    /// terms are ignored, and a query with no known terms scores 0 everywhere.
    pub fn score(&self, query: &str) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.num_docs as usize];

        let normalized = self.normalizer.normalize(query);
        let mut tf_q: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in terms(&normalized) {
            if let Some(&tid) = self.dictionary.get(term) {
                *tf_q.entry(tid).or_insert(0) += 1;
            }
        }
        if tf_q.is_empty() {
            return scores;
        }

        let mut q_weights: Vec<(TermId, f32)> = tf_q
            .into_iter()
            .map(|(tid, tf)| {
                let w = match self.weighting {
                    QueryWeighting::RawTf => tf as f32,
                    QueryWeighting::TfIdf => tf as f32 * self.idf[tid as usize],
                };
                (tid, w)
            })
            .collect();
        let norm = q_weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            return scores;
        }
        for (_, w) in q_weights.iter_mut() { *w /= norm; }

        // Document rows are unit length, so the dot product is the cosine.
        for (tid, q_w) in q_weights {
            for p in &self.postings[tid as usize] {
                scores[p.doc_id as usize] += p.weight * q_w;
            }
        }
        scores
    }
}
