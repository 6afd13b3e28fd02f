//! Configuration for snapchem
//!
//! Loaded from a TOML file; every section and field is optional.
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:8000"
//! cors_origins = ["http://localhost:3000"]
//!
//! [registry]
//! catalog_path = "chemicals.toml"
//! list_limit = 50
//! text_limit = 5
//!
//! [resolver]
//! max_matches = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// System-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapchemConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Registry settings
    pub registry: RegistryConfig,
    /// Match resolution settings
    pub resolver: ResolverConfig,
}

impl SnapchemConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub addr: String,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// TOML catalog of chemicals; the demo catalog is used when absent
    pub catalog_path: Option<PathBuf>,
    /// Records returned by an empty text query
    pub list_limit: usize,
    /// Maximum records returned by a non-empty text query
    pub text_limit: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            list_limit: 50,
            text_limit: None,
        }
    }
}

/// Match resolution configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Truncate the ranked matches to this many records
    pub max_matches: Option<usize>,
}
