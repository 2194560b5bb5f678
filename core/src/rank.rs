use crate::document::{Document, QualityFeatures};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankWeights {
    pub similarity: f32,
    pub total_words: f32,
    pub unique_words: f32,
    /// Applied to `1 - stopwords_norm`: fewer stopwords score higher.
    pub stopwords: f32,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self { similarity: 0.5, total_words: 0.2, unique_words: 0.2, stopwords: 0.1 }
    }
}

impl RankWeights {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        [
            ("similarity", self.similarity),
            ("total_words", self.total_words),
            ("unique_words", self.unique_words),
            ("stopwords", self.stopwords),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedResult {
    /// Position of the document in the corpus.
    pub position: usize,
    pub similarity: f32,
    pub adjusted_score: f32,
}

pub fn adjusted_score(similarity: f32, f: &QualityFeatures, w: &RankWeights) -> f32 {
    w.similarity * similarity
        + w.total_words * f.total_words_norm
        + w.unique_words * f.unique_words_norm
        + w.stopwords * (1.0 - f.stopwords_norm)
}

/// Higher adjusted score first, then higher similarity.
pub fn compare_ranked(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.adjusted_score
        .total_cmp(&a.adjusted_score)
        .then_with(|| b.similarity.total_cmp(&a.similarity))
}

/// Stable, so exact ties keep their incoming order.
pub fn sort_ranked(results: &mut [RankedResult]) {
    results.sort_by(compare_ranked);
}

/// Rank every document; `similarities[i]` belongs to `docs[i]`.
pub fn rank(similarities: &[f32], docs: &[Document], weights: &RankWeights) -> Vec<RankedResult> {
    debug_assert_eq!(similarities.len(), docs.len());
    rank_candidates(similarities.iter().copied().enumerate(), docs, weights)
}

/// Rank an arbitrary `(position, similarity)` subset of the corpus.
pub fn rank_candidates<I>(candidates: I, docs: &[Document], weights: &RankWeights) -> Vec<RankedResult>
where
    I: IntoIterator<Item = (usize, f32)>,
{
    let mut ranked: Vec<RankedResult> = candidates
        .into_iter()
        .filter_map(|(position, similarity)| {
            let doc = docs.get(position)?;
            Some(RankedResult { position, similarity, adjusted_score: adjusted_score(similarity, &doc.features, weights) })
        })
        .collect();
    sort_ranked(&mut ranked);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Article, Corpus};
    use crate::tokenizer::Normalizer;

    fn corpus(features: &[(u32, f32, f32)]) -> Corpus {
        let articles = features
            .iter()
            .enumerate()
            .map(|(i, &(total_words, unique, stop))| Article {
                topic: "t".into(),
                title: format!("doc {i}"),
                content: String::new(),
                link: format!("l{i}"),
                total_words,
                unique_words_percentage: unique,
                stopwords_percentage: stop,
            })
            .collect();
        Corpus::build(articles, &Normalizer::default()).unwrap()
    }

    #[test]
    fn blends_similarity_with_inverted_stopwords() {
        let f = QualityFeatures { total_words_norm: 1.0, unique_words_norm: 0.5, stopwords_norm: 0.2 };
        let score = adjusted_score(0.4, &f, &RankWeights::default());
        // 0.5*0.4 + 0.2*1.0 + 0.2*0.5 + 0.1*0.8
        assert!((score - 0.58).abs() < 1e-6);
    }

    #[test]
    fn output_is_sorted_descending() {
        let c = corpus(&[(10, 30.0, 50.0), (100, 60.0, 10.0), (50, 45.0, 30.0), (70, 10.0, 90.0)]);
        let ranked = rank(&[0.9, 0.0, 0.3, 0.5], c.documents(), &RankWeights::default());
        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].adjusted_score >= pair[1].adjusted_score);
        }
    }

    #[test]
    fn ties_fall_back_to_similarity_then_corpus_order() {
        let c = corpus(&[(10, 50.0, 50.0), (10, 50.0, 50.0), (10, 50.0, 50.0)]);
        let weights = RankWeights { similarity: 0.0, ..RankWeights::default() };
        let ranked = rank(&[0.1, 0.7, 0.1], c.documents(), &weights);
        let order: Vec<usize> = ranked.iter().map(|r| r.position).collect();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn candidates_outside_the_corpus_are_ignored() {
        let c = corpus(&[(10, 50.0, 50.0)]);
        let ranked = rank_candidates([(0, 0.0), (7, 1.0)], c.documents(), &RankWeights::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].position, 0);
    }
}
