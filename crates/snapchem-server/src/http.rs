//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use snapchem_core::{
    extract, ChemicalRecord, ExtractionResult, Identification, MatchResolver, ResolveError,
};

use crate::AppState;

/// Request carrying label text
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Query for the chemical listing
#[derive(Debug, Default, Deserialize)]
pub struct ChemicalsQuery {
    #[serde(default)]
    pub q: String,
}

/// Liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// Run a resolver call on the blocking pool
async fn with_resolver<T, F>(state: Arc<AppState>, f: F) -> Result<T, (StatusCode, String)>
where
    F: FnOnce(&MatchResolver) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.resolver))
        .await
        .map_err(|e| {
            tracing::error!("resolver task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

/// Search the registry; an empty query lists chemicals
pub async fn list_chemicals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChemicalsQuery>,
) -> Result<Json<Vec<ChemicalRecord>>, (StatusCode, String)> {
    with_resolver(state, move |resolver| resolver.search(&query.q))
        .await?
        .map(Json)
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
}

/// Get a specific chemical
pub async fn get_chemical(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChemicalRecord>, (StatusCode, String)> {
    let lookup_id = id.clone();
    with_resolver(state, move |resolver| resolver.get(&lookup_id))
        .await?
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Chemical not found: {}", id)))
}

/// Extract CAS and UN numbers without consulting the registry
pub async fn extract_identifiers(Json(request): Json<TextRequest>) -> Json<ExtractionResult> {
    Json(extract(&request.text))
}

/// Extract identifiers from label text and match them against the registry.
///
/// An unreachable registry is a 503, never an empty match list.
pub async fn identify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Identification>, (StatusCode, String)> {
    with_resolver(state, move |resolver| resolver.identify(&request.text))
        .await?
        .map(Json)
        .map_err(|e| match e {
            ResolveError::RegistryUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
        })
}
