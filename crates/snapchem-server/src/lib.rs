//! SnapChem Server - label identification API
//!
//! HTTP wrapper around the SnapChem core for the web front end.

pub mod http;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use snapchem_core::{
    ChemicalRegistry, InMemoryRegistry, MatchResolver, ResolverConfig, SnapchemConfig,
};

/// Shared application state.
///
/// The registry trait is synchronous. Handlers run every resolver call on
/// tokio's blocking pool (`tokio::task::spawn_blocking`), so a registry
/// backed by blocking I/O never stalls the async workers.
pub struct AppState {
    pub resolver: MatchResolver,
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Create over any registry with default resolver settings
    pub fn new(registry: Arc<dyn ChemicalRegistry>) -> Self {
        Self::with_resolver_config(registry, ResolverConfig::default())
    }

    pub fn with_resolver_config(
        registry: Arc<dyn ChemicalRegistry>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            resolver: MatchResolver::with_config(registry, config),
            cors_origins: Vec::new(),
        }
    }

    /// Create from configuration, loading the catalog it names
    pub fn from_config(config: &SnapchemConfig) -> snapchem_core::Result<Self> {
        let registry = InMemoryRegistry::from_config(&config.registry)?;
        tracing::info!("Registry ready with {} chemicals", registry.len());

        let mut state = Self::with_resolver_config(Arc::new(registry), config.resolver.clone());
        state.cors_origins = config.server.cors_origins.clone();
        Ok(state)
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(http::health))
        // Registry endpoints
        .route("/chemicals", get(http::list_chemicals))
        .route("/chemicals/{id}", get(http::get_chemical))
        // Label endpoints
        .route("/extract", post(http::extract_identifiers))
        .route("/identify", post(http::identify))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("SnapChem server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
