//! Error types for snapchem-core

use thiserror::Error;

use crate::registry::RegistryError;

/// Result type alias for snapchem operations
pub type Result<T> = std::result::Result<T, SnapchemError>;

/// Main error type for snapchem operations
#[derive(Error, Debug)]
pub enum SnapchemError {
    /// Registry lookup errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Resolution errors
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Catalog loading errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Resolution-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Every registry call issued during resolution failed
    #[error("Registry unavailable: all {attempts} lookups failed (last: {last_error})")]
    RegistryUnavailable {
        attempts: usize,
        last_error: RegistryError,
    },
}

/// Catalog-specific errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(String),

    /// Two records share an id
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    /// A record failed validation
    #[error("Invalid record '{id}': {message}")]
    InvalidRecord { id: String, message: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
