use crate::error::{RetrievalError, RetrievalResult};
use crate::tokenizer::Normalizer;
use serde::{Deserialize, Serialize};

/// One article record as handed over by the corpus loader, already stamped with its topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub topic: String,
    pub title: String,
    pub content: String,
    pub link: String,
    pub total_words: u32,
    pub unique_words_percentage: f32,
    pub stopwords_percentage: f32,
}

/// Corpus-relative quality signals, each in `[0, 1]` for valid input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QualityFeatures {
    pub total_words_norm: f32,
    pub unique_words_norm: f32,
    pub stopwords_norm: f32,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub topic: String,
    pub title: String,
    pub content: String,
    pub link: String,
    pub total_words: u32,
    pub unique_words_percentage: f32,
    pub stopwords_percentage: f32,
    pub processed_title: String,
    pub processed_content: String,
    /// `processed_title + " " + processed_content`
    pub combined_text: String,
    pub features: QualityFeatures,
}

/// Ordered, read-only document collection. Built once; never mutated.
#[derive(Debug, Clone)]
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    pub fn build(articles: Vec<Article>, normalizer: &Normalizer) -> RetrievalResult<Self> {
        if articles.is_empty() {
            return Err(RetrievalError::EmptyCorpus);
        }
        let max_total_words = articles.iter().map(|a| a.total_words).max().unwrap_or(0);

        let docs = articles
            .into_iter()
            .map(|a| {
                let processed_title = normalizer.normalize(&a.title);
                let processed_content = normalizer.normalize(&a.content);
                let combined_text = format!("{processed_title} {processed_content}");
                // All-zero word counts would divide by zero; treat them as carrying no signal.
                let total_words_norm = if max_total_words == 0 {
                    0.0
                } else {
                    a.total_words as f32 / max_total_words as f32
                };
                let features = QualityFeatures {
                    total_words_norm,
                    unique_words_norm: a.unique_words_percentage / 100.0,
                    stopwords_norm: a.stopwords_percentage / 100.0,
                };
                Document {
                    topic: a.topic,
                    title: a.title,
                    content: a.content,
                    link: a.link,
                    total_words: a.total_words,
                    unique_words_percentage: a.unique_words_percentage,
                    stopwords_percentage: a.stopwords_percentage,
                    processed_title,
                    processed_content,
                    combined_text,
                    features,
                }
            })
            .collect();
        Ok(Self { docs })
    }

    pub fn len(&self) -> usize { self.docs.len() }

    /// Always false for a successfully built corpus.
    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn documents(&self) -> &[Document] { &self.docs }

    pub fn get(&self, position: usize) -> Option<&Document> { self.docs.get(position) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(link: &str, total_words: u32) -> Article {
        Article {
            topic: "ml".into(),
            title: "The Title".into(),
            content: "Some content, with 3 digits!".into(),
            link: link.into(),
            total_words,
            unique_words_percentage: 40.0,
            stopwords_percentage: 25.0,
        }
    }

    #[test]
    fn rejects_empty_corpus() {
        let err = Corpus::build(vec![], &Normalizer::default()).unwrap_err();
        assert_eq!(err, RetrievalError::EmptyCorpus);
    }

    #[test]
    fn derives_processed_fields_and_features() {
        let corpus = Corpus::build(vec![article("a", 50), article("b", 200)], &Normalizer::default()).unwrap();
        let doc = corpus.get(0).unwrap();
        assert_eq!(doc.processed_title, "title");
        assert_eq!(doc.processed_content, "some content digits");
        assert_eq!(doc.combined_text, "title some content digits");
        assert_eq!(doc.features.total_words_norm, 0.25);
        assert_eq!(doc.features.unique_words_norm, 0.4);
        assert_eq!(doc.features.stopwords_norm, 0.25);
    }

    #[test]
    fn total_words_norm_peaks_at_the_maximum() {
        let corpus = Corpus::build(
            vec![article("a", 10), article("b", 300), article("c", 0), article("d", 150)],
            &Normalizer::default(),
        )
        .unwrap();
        let norms: Vec<f32> = corpus.documents().iter().map(|d| d.features.total_words_norm).collect();
        assert!(norms.iter().all(|n| (0.0..=1.0).contains(n)));
        assert_eq!(norms.iter().filter(|n| **n == 1.0).count(), 1);
        assert_eq!(norms[1], 1.0);
    }

    #[test]
    fn zero_word_counts_do_not_produce_nan() {
        let corpus = Corpus::build(vec![article("a", 0), article("b", 0)], &Normalizer::default()).unwrap();
        assert!(corpus.documents().iter().all(|d| d.features.total_words_norm == 0.0));
    }
}
