use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

const CORPUS: &str = r#"{
    "ai": [
        {"title": "Neural Networks Basics", "content": "neural neural neural neural neural", "link": "https://example.com/nn",
         "total_words": 100, "unique_words_percentage": 50, "stopwords_percentage": 20},
        {"title": "Deep Learning at Scale", "content": "deep learning training clusters", "link": "https://example.com/dl",
         "total_words": 80, "unique_words_percentage": 45, "stopwords_percentage": 30}
    ],
    "security": [
        {"title": "Cloud Security", "content": "encryption identity cloud", "link": "https://example.com/cloud",
         "total_words": 60, "unique_words_percentage": 40, "stopwords_percentage": 25}
    ]
}"#;

fn build_tiny_app() -> Router {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.json");
    fs::write(&path, CORPUS).unwrap();
    let engine = lexrank_server::load_engine(&path, None).unwrap();
    lexrank_server::build_app(Arc::new(engine))
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn post_search(body: &str) -> Request<Body> {
    Request::post("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn post_search_returns_ranked_records() {
    let (status, json) = call(build_tiny_app(), post_search(r#"{"query": "nn"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    let top = &arr[0];
    assert_eq!(top["link"], "https://example.com/nn");
    assert_eq!(top["total_words"], 100);
    assert!((top["unique_words_norm"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    assert!((top["stopwords_norm"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    assert!(top.get("adjusted_score").is_none());
}

#[tokio::test]
async fn empty_query_is_a_bad_request() {
    let (status, json) = call(build_tiny_app(), post_search(r#"{"query": "   "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "query cannot be empty");

    let (status, _) = call(build_tiny_app(), post_search("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_search_supports_phrase_prefilter() {
    let req = Request::get("/search?q=%22cloud%20security%22&phrases=true").body(Body::empty()).unwrap();
    let (status, json) = call(build_tiny_app(), req).await;
    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["title"], "Cloud Security");
}

#[tokio::test]
async fn health_is_ok() {
    let app = build_tiny_app();
    let resp = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[test]
fn empty_corpus_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.json");
    fs::write(&path, r#"{"ai": []}"#).unwrap();
    let err = lexrank_server::load_engine(&path, None).err().unwrap();
    assert_eq!(err.downcast_ref::<lexrank_core::RetrievalError>(), Some(&lexrank_core::RetrievalError::EmptyCorpus));
}
