//! SnapChem core - identify chemicals from label text
//!
//! - **Registry**: the lookup capability chemical records are fetched through
//! - **Memory**: an in-memory registry backed by a TOML catalog or the demo set
//! - **Resolver**: turns extracted CAS/UN numbers and raw text into ranked matches
//! - **Config**: server, registry and resolver settings loaded from TOML
//!
//! Extraction lives in `snapchem-identifiers` and is re-exported here.

pub mod config;
pub mod error;
pub mod memory;
pub mod registry;
pub mod resolver;

pub use config::{RegistryConfig, ResolverConfig, ServerConfig, SnapchemConfig};
pub use error::{CatalogError, ConfigError, ResolveError, Result, SnapchemError};
pub use memory::InMemoryRegistry;
pub use registry::{ChemicalRegistry, RegistryError};
pub use resolver::{Identification, MatchResolver, MatchResult};

pub use snapchem_domain::ChemicalRecord;
pub use snapchem_identifiers::{extract, CasNumber, ExtractionResult, UnNumber};
