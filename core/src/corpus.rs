use crate::document::Article;
use crate::error::RetrievalError;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do with a record that lacks a required field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Fail the whole load.
    #[default]
    Reject,
    /// Drop the record and log a warning.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub missing_fields: MissingFieldPolicy,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    content: Option<String>,
    link: Option<String>,
    total_words: Option<u32>,
    unique_words_percentage: Option<f32>,
    stopwords_percentage: Option<f32>,
}

impl RawArticle {
    fn into_article(self, topic: &str, position: usize) -> Result<Article, RetrievalError> {
        let missing = |field: &'static str| RetrievalError::MissingField { position, field };
        Ok(Article {
            topic: topic.to_string(),
            title: self.title.ok_or_else(|| missing("title"))?,
            content: self.content.ok_or_else(|| missing("content"))?,
            link: self.link.ok_or_else(|| missing("link"))?,
            total_words: self.total_words.ok_or_else(|| missing("total_words"))?,
            unique_words_percentage: self.unique_words_percentage.ok_or_else(|| missing("unique_words_percentage"))?,
            stopwords_percentage: self.stopwords_percentage.ok_or_else(|| missing("stopwords_percentage"))?,
        })
    }
}

/// Load a grouped corpus (`{ topic: [article, ...], ... }`) from a file, or from every
/// `*.json` file under a directory in file-name order.
pub fn load_corpus<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Vec<Article>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        bail!("corpus path {} does not exist", path.display());
    }

    let mut articles = Vec::new();
    let mut position = 0usize;
    for file in files {
        let reader = BufReader::new(File::open(&file).with_context(|| format!("opening {}", file.display()))?);
        let json: Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
        flatten(json, opts, &mut position, &mut articles).with_context(|| format!("loading {}", file.display()))?;
    }
    tracing::info!(path = %path.display(), num_docs = articles.len(), "corpus loaded");
    Ok(articles)
}

/// Same as [`load_corpus`] for in-memory JSON text.
pub fn parse_corpus(text: &str, opts: &LoadOptions) -> Result<Vec<Article>> {
    let json: Value = serde_json::from_str(text)?;
    let mut articles = Vec::new();
    let mut position = 0usize;
    flatten(json, opts, &mut position, &mut articles)?;
    Ok(articles)
}

fn flatten(json: Value, opts: &LoadOptions, position: &mut usize, out: &mut Vec<Article>) -> Result<()> {
    let groups: Map<String, Value> = match json {
        Value::Object(map) => map,
        _ => bail!("expected a JSON object mapping topic to a list of articles"),
    };
    for (topic, records) in groups {
        let records: Vec<RawArticle> =
            serde_json::from_value(records).with_context(|| format!("topic `{topic}` is not a list of articles"))?;
        for raw in records {
            let pos = *position;
            *position += 1;
            match raw.into_article(&topic, pos) {
                Ok(article) => out.push(article),
                Err(err) if opts.missing_fields == MissingFieldPolicy::Skip => {
                    tracing::warn!(%topic, error = %err, "skipping article");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(())
}
