use snapchem_domain::ChemicalRecord;

/// The lookup capability the resolver consults.
///
/// Implementations own their records; callers only read them. Result order
/// is not assumed to be ranked.
pub trait ChemicalRegistry: Send + Sync {
    /// Search names, synonyms, CAS and UN numbers for the query.
    fn find_by_text(&self, query: &str) -> Result<Vec<ChemicalRecord>, RegistryError>;

    /// Enumerate every record.
    fn find_all(&self) -> Result<Vec<ChemicalRecord>, RegistryError>;

    /// Get a record by its id.
    fn find_by_id(&self, id: &str) -> Result<Option<ChemicalRecord>, RegistryError> {
        Ok(self.find_all()?.into_iter().find(|record| record.id == id))
    }
}

/// Errors reported by a registry backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Registry call timed out: {0}")]
    Timeout(String),

    #[error("Registry backend error: {0}")]
    Backend(String),
}
