//! SnapChem Server Binary
//!
//! Reads the config file named by `SNAPCHEM_CONFIG` (defaults otherwise);
//! `SNAPCHEM_ADDR` overrides the listen address.

use std::path::PathBuf;
use std::sync::Arc;

use snapchem_core::SnapchemConfig;
use snapchem_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match std::env::var_os("SNAPCHEM_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            tracing::info!("Loading config from {:?}", path);
            SnapchemConfig::load(&path)?
        }
        None => SnapchemConfig::default(),
    };
    if let Ok(addr) = std::env::var("SNAPCHEM_ADDR") {
        config.server.addr = addr;
    }

    let state = Arc::new(AppState::from_config(&config)?);
    serve(&config.server.addr, state).await
}
