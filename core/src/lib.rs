pub mod config;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod rank;
pub mod rewrite;
pub mod spelling;
pub mod tokenizer;

pub use config::EngineConfig;
pub use corpus::{load_corpus, parse_corpus, LoadOptions, MissingFieldPolicy};
pub use document::{Article, Corpus, Document, QualityFeatures};
pub use engine::{EngineBuilder, RetrievalPath, ScoredHit, SearchEngine, SearchResult, SearchTrace};
pub use error::{RetrievalError, RetrievalResult};
pub use index::{DocId, LexiconIndex, Posting, QueryWeighting, TermId};
pub use rank::{RankWeights, RankedResult};
pub use spelling::{Corrector, FrequencyCorrector, NoCorrection};
pub use tokenizer::Normalizer;
