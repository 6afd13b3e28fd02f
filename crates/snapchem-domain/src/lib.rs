//! Chemical domain types shared by the SnapChem core and server
//!
//! - ChemicalRecord: a registry entry with identifiers and handling guidance
//! - Validation: record-level checks used when loading catalogs

pub mod chemical;
pub mod validation;

pub use chemical::*;
pub use validation::*;
