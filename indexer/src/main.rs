use anyhow::Result;
use clap::{Parser, Subcommand};
use lexrank_core::{load_corpus, EngineConfig, LoadOptions, MissingFieldPolicy, SearchEngine};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build TF-IDF lexicon indexes over a grouped corpus and query them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build both indexes and print corpus statistics as JSON
    Stats {
        /// Corpus path (file or directory)
        #[arg(long)]
        corpus: PathBuf,
        /// Drop articles with missing fields instead of failing
        #[arg(long, default_value_t = false)]
        skip_incomplete: bool,
    },
    /// Run one query and print the traced result as JSON
    Query {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        query: String,
        /// Engine config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Apply the quoted-phrase title pre-filter first
        #[arg(long, default_value_t = false)]
        phrases: bool,
        #[arg(long, default_value_t = false)]
        skip_incomplete: bool,
    },
}

#[derive(Debug, Serialize, PartialEq)]
struct TopicCount {
    topic: String,
    docs: usize,
}

#[derive(Debug, Serialize)]
struct CorpusStats {
    num_docs: usize,
    topics: Vec<TopicCount>,
    title_terms: usize,
    content_terms: usize,
    max_total_words: u32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { corpus, skip_incomplete } => {
            let engine = build_engine(&corpus, None, skip_incomplete)?;
            println!("{}", serde_json::to_string_pretty(&corpus_stats(&engine))?);
        }
        Commands::Query { corpus, query, config, phrases, skip_incomplete } => {
            let engine = build_engine(&corpus, config.as_deref(), skip_incomplete)?;
            let trace = if phrases { engine.search_with_phrases(&query)? } else { engine.search_traced(&query)? };
            println!("{}", serde_json::to_string_pretty(&trace)?);
        }
    }
    Ok(())
}

fn build_engine(corpus: &Path, config: Option<&Path>, skip_incomplete: bool) -> Result<SearchEngine> {
    let config = match config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let opts = LoadOptions {
        missing_fields: if skip_incomplete { MissingFieldPolicy::Skip } else { MissingFieldPolicy::Reject },
    };
    let articles = load_corpus(corpus, &opts)?;
    let engine = SearchEngine::new(articles, config)?;
    tracing::info!(corpus = %corpus.display(), "index build complete");
    Ok(engine)
}

fn corpus_stats(engine: &SearchEngine) -> CorpusStats {
    let docs = engine.corpus().documents();
    // topics arrive grouped, so counting consecutive runs keeps file order
    let mut topics: Vec<TopicCount> = Vec::new();
    for doc in docs {
        match topics.last_mut() {
            Some(last) if last.topic == doc.topic => last.docs += 1,
            _ => topics.push(TopicCount { topic: doc.topic.clone(), docs: 1 }),
        }
    }
    CorpusStats {
        num_docs: docs.len(),
        topics,
        title_terms: engine.title_index().vocabulary_len(),
        content_terms: engine.content_index().vocabulary_len(),
        max_total_words: docs.iter().map(|d| d.total_words).max().unwrap_or(0),
    }
}
