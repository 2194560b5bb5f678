use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetrievalError {
    /// Query was empty or whitespace-only after trimming.
    #[error("query cannot be empty")]
    EmptyQuery,
    /// Corpus had no documents; the normalization denominators are undefined.
    #[error("corpus contains no documents")]
    EmptyCorpus,
    #[error("document {position} is missing required field `{field}`")]
    MissingField { position: usize, field: &'static str },
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

pub type RetrievalResult<T> = std::result::Result<T, RetrievalError>;
