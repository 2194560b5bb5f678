use crate::error::{RetrievalError, RetrievalResult};
use crate::index::QueryWeighting;
use crate::rank::RankWeights;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: RankWeights,
    /// Maximum number of results returned per query.
    pub result_limit: usize,
    /// Content-side max similarity below which the title index is consulted too.
    pub fallback_threshold: f32,
    pub query_weighting: QueryWeighting,
    pub max_edit_distance: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: RankWeights::default(),
            result_limit: 5,
            fallback_threshold: 0.1,
            query_weighting: QueryWeighting::RawTf,
            max_edit_distance: 2,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file; absent keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let cfg: EngineConfig = serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> RetrievalResult<()> {
        for (name, w) in self.weights.iter() {
            if !w.is_finite() || w < 0.0 {
                return Err(RetrievalError::InvalidConfig(format!("weight `{name}` must be finite and non-negative, got {w}")));
            }
        }
        if self.result_limit == 0 {
            return Err(RetrievalError::InvalidConfig("result_limit must be at least 1".into()));
        }
        if !self.fallback_threshold.is_finite() {
            return Err(RetrievalError::InvalidConfig("fallback_threshold must be finite".into()));
        }
        Ok(())
    }
}
