use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use lexrank_core::{load_corpus, EngineConfig, LoadOptions, RetrievalError, SearchEngine, SearchResult, SearchTrace};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub query: String,
    /// Opt into the quoted-phrase title pre-filter.
    #[serde(default)]
    pub phrases: bool,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub phrases: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

pub struct ApiError(RetrievalError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RetrievalError::EmptyQuery => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Load the corpus and build both indexes. Blocking; runs to completion before serving.
pub fn load_engine(corpus: &Path, config: Option<&Path>) -> Result<SearchEngine> {
    let config = match config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let articles = load_corpus(corpus, &LoadOptions::default())?;
    Ok(SearchEngine::new(articles, config)?)
}

pub fn build_app(engine: Arc<SearchEngine>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_get).post(search_post))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_post(State(state): State<AppState>, Json(body): Json<SearchBody>) -> Result<Json<Vec<SearchResult>>, ApiError> {
    run_search(&state, &body.query, body.phrases)
}

pub async fn search_get(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<Vec<SearchResult>>, ApiError> {
    run_search(&state, &params.q, params.phrases)
}

fn run_search(state: &AppState, query: &str, phrases: bool) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let start = std::time::Instant::now();
    let result: Result<SearchTrace, RetrievalError> = if phrases {
        state.engine.search_with_phrases(query)
    } else {
        state.engine.search_traced(query)
    };
    let trace = result.map_err(ApiError)?;
    tracing::info!(
        query = %trace.query,
        path = ?trace.path,
        hits = trace.hits.len(),
        took_s = start.elapsed().as_secs_f64(),
        "search"
    );
    Ok(Json(trace.into_results()))
}
