//! HTTP API tests driving the router in-process

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use snapchem_core::{ChemicalRecord, ChemicalRegistry, InMemoryRegistry, RegistryError};
use snapchem_server::{create_router, AppState};

struct DownRegistry;

impl ChemicalRegistry for DownRegistry {
    fn find_by_text(&self, _query: &str) -> Result<Vec<ChemicalRecord>, RegistryError> {
        Err(RegistryError::Unavailable("database offline".into()))
    }

    fn find_all(&self) -> Result<Vec<ChemicalRecord>, RegistryError> {
        Err(RegistryError::Unavailable("database offline".into()))
    }
}

/// Demo registry that records which thread served each call
struct ThreadRecordingRegistry {
    inner: InMemoryRegistry,
    threads: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingRegistry {
    fn note_thread(&self) {
        self.threads.lock().unwrap().push(thread::current().id());
    }
}

impl ChemicalRegistry for ThreadRecordingRegistry {
    fn find_by_text(&self, query: &str) -> Result<Vec<ChemicalRecord>, RegistryError> {
        self.note_thread();
        self.inner.find_by_text(query)
    }

    fn find_all(&self) -> Result<Vec<ChemicalRecord>, RegistryError> {
        self.note_thread();
        self.inner.find_all()
    }
}

fn demo_app() -> Router {
    create_router(Arc::new(AppState::new(Arc::new(InMemoryRegistry::demo()))))
}

fn down_app() -> Router {
    create_router(Arc::new(AppState::new(Arc::new(DownRegistry))))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(demo_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "ok": true }));
}

#[tokio::test]
async fn test_identify_acetone_label() {
    let (status, body) = post_json(
        demo_app(),
        "/identify",
        json!({ "text": "Acetone CAS 67-64-1 UN1090" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["extracted"], json!({ "cas": ["67-64-1"], "un": ["UN1090"] }));
    assert_eq!(body["matches"].as_array().unwrap().len(), 1);
    assert_eq!(body["matches"][0]["id"], "chem-acetone");
    assert_eq!(body["matches"][0]["ppe"][0], "Goggles");
}

#[tokio::test]
async fn test_identify_unknown_label_is_empty_ok() {
    let (status, body) =
        post_json(demo_app(), "/identify", json!({ "text": "Toluene 108-88-3" })).await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["extracted"]["cas"], json!(["108-88-3"]));
    assert_eq!(body["matches"], json!([]));
}

#[tokio::test]
async fn test_identify_with_registry_down_is_503() {
    let (status, body) =
        post_json(down_app(), "/identify", json!({ "text": "Acetone 67-64-1" })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(String::from_utf8(body).unwrap().contains("database offline"));
}

#[tokio::test]
async fn test_identify_rejects_malformed_payload() {
    let (status, _) = post_json(demo_app(), "/identify", json!({ "label": 42 })).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_extract_only() {
    let (status, body) =
        post_json(down_app(), "/extract", json!({ "text": "un 2014, 7722-84-1" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!({ "cas": ["7722-84-1"], "un": ["UN2014"] })
    );
}

#[tokio::test]
async fn test_list_chemicals() {
    let (status, body) = get(demo_app(), "/chemicals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body).as_array().unwrap().len(), 3);

    let (status, body) = get(demo_app(), "/chemicals?q=peroxide").await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "chem-h2o2-30");
}

#[tokio::test]
async fn test_list_chemicals_registry_down() {
    let (status, _) = get(down_app(), "/chemicals?q=acetone").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_get_chemical() {
    let (status, body) = get(demo_app(), "/chemicals/chem-naoh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["name"], "Sodium hydroxide");

    let (status, _) = get(demo_app(), "/chemicals/chem-unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registry_calls_run_off_the_async_thread() {
    let registry = Arc::new(ThreadRecordingRegistry {
        inner: InMemoryRegistry::demo(),
        threads: Mutex::default(),
    });
    let app = create_router(Arc::new(AppState::new(registry.clone())));

    let (status, _) =
        post_json(app.clone(), "/identify", json!({ "text": "Acetone 67-64-1" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(app.clone(), "/chemicals?q=lye").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(app, "/chemicals/chem-naoh").await;
    assert_eq!(status, StatusCode::OK);

    // The current-thread test runtime polls handlers on this thread
    let runtime_thread = thread::current().id();
    let threads = registry.threads.lock().unwrap();
    assert!(threads.len() >= 3);
    assert!(threads.iter().all(|id| *id != runtime_thread));
}
