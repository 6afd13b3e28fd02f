//! Match resolution against the chemical registry
//!
//! Resolution runs a fixed fallback chain and stops widening the search as
//! soon as a step produces records:
//!
//! 1. one `find_by_text` per extracted identifier, CAS numbers first
//! 2. one `find_by_text` with the whole raw text
//! 3. `find_all`, keeping records whose CAS or UN equals an extracted one
//!
//! Records are merged in that priority order and deduplicated by id, first
//! occurrence wins. A failed registry call counts as an empty answer; only
//! when every issued call failed is `RegistryUnavailable` reported.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use snapchem_domain::ChemicalRecord;
use snapchem_identifiers::{extract, ExtractionResult};

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::registry::{ChemicalRegistry, RegistryError};

/// Ranked candidate records, unique by record id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchResult {
    records: Vec<ChemicalRecord>,
}

impl MatchResult {
    pub fn records(&self) -> &[ChemicalRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ChemicalRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record ids in rank order
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }
}

impl IntoIterator for MatchResult {
    type Item = ChemicalRecord;
    type IntoIter = std::vec::IntoIter<ChemicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Identifiers found in a label together with the matching records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identification {
    pub extracted: ExtractionResult,
    pub matches: MatchResult,
}

/// Accumulates records in priority order, skipping ids already seen
#[derive(Default)]
struct MatchSet {
    seen: HashSet<String>,
    records: Vec<ChemicalRecord>,
}

impl MatchSet {
    fn extend(&mut self, records: impl IntoIterator<Item = ChemicalRecord>) {
        for record in records {
            if self.seen.insert(record.id.clone()) {
                self.records.push(record);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Bookkeeping of registry calls issued during one resolution
#[derive(Default)]
struct CallLog {
    issued: usize,
    failed: usize,
    last_error: Option<RegistryError>,
}

impl CallLog {
    /// Record a call outcome; failures become `None` so the chain can continue
    fn record(
        &mut self,
        step: &str,
        query: &str,
        result: Result<Vec<ChemicalRecord>, RegistryError>,
    ) -> Option<Vec<ChemicalRecord>> {
        self.issued += 1;
        match result {
            Ok(records) => {
                tracing::debug!(step, query, hits = records.len(), "registry lookup");
                Some(records)
            }
            Err(e) => {
                tracing::warn!(step, query, "registry lookup failed: {}", e);
                self.failed += 1;
                self.last_error = Some(e);
                None
            }
        }
    }

    fn unavailable(self) -> Option<ResolveError> {
        if self.issued == 0 || self.failed < self.issued {
            return None;
        }
        self.last_error
            .map(|last_error| ResolveError::RegistryUnavailable {
                attempts: self.issued,
                last_error,
            })
    }
}

/// Resolves label text and extracted identifiers to registry records.
///
/// Holds no per-call state; one resolver can serve concurrent callers.
#[derive(Clone)]
pub struct MatchResolver {
    registry: Arc<dyn ChemicalRegistry>,
    config: ResolverConfig,
}

impl MatchResolver {
    pub fn new(registry: Arc<dyn ChemicalRegistry>) -> Self {
        Self::with_config(registry, ResolverConfig::default())
    }

    pub fn with_config(registry: Arc<dyn ChemicalRegistry>, config: ResolverConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Extract identifiers from the text, then resolve them
    pub fn identify(&self, raw_text: &str) -> Result<Identification, ResolveError> {
        let extracted = extract(raw_text);
        let matches = self.resolve(raw_text, &extracted)?;
        Ok(Identification { extracted, matches })
    }

    /// Resolve raw text and its extracted identifiers to ranked matches
    pub fn resolve(
        &self,
        raw_text: &str,
        extraction: &ExtractionResult,
    ) -> Result<MatchResult, ResolveError> {
        let mut calls = CallLog::default();
        let mut matches = MatchSet::default();

        for identifier in extraction.identifiers() {
            let result = self.registry.find_by_text(identifier);
            if let Some(records) = calls.record("identifier", identifier, result) {
                matches.extend(records);
            }
        }

        let query = raw_text.trim();
        if matches.is_empty() && !query.is_empty() {
            let result = self.registry.find_by_text(query);
            if let Some(records) = calls.record("text", query, result) {
                matches.extend(records);
            }
        }

        if matches.is_empty() && !extraction.is_empty() {
            let result = self.registry.find_all();
            if let Some(records) = calls.record("exact", "*", result) {
                matches.extend(
                    records
                        .into_iter()
                        .filter(|record| matches_exactly(record, extraction)),
                );
            }
        }

        if let Some(err) = calls.unavailable() {
            tracing::error!("match resolution failed: {}", err);
            return Err(err);
        }

        let mut records = matches.records;
        if let Some(max) = self.config.max_matches {
            records.truncate(max);
        }
        Ok(MatchResult { records })
    }

    /// Free-text registry search
    pub fn search(&self, query: &str) -> Result<Vec<ChemicalRecord>, RegistryError> {
        self.registry.find_by_text(query)
    }

    /// Fetch a single record by id
    pub fn get(&self, id: &str) -> Result<Option<ChemicalRecord>, RegistryError> {
        self.registry.find_by_id(id)
    }
}

/// Whether the record carries one of the extracted identifiers verbatim
fn matches_exactly(record: &ChemicalRecord, extraction: &ExtractionResult) -> bool {
    extraction.cas().iter().any(|cas| record.has_cas(cas))
        || extraction.un().iter().any(|un| record.has_un(un))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRegistry;

    fn demo_resolver() -> MatchResolver {
        MatchResolver::new(Arc::new(InMemoryRegistry::demo()))
    }

    #[test]
    fn identify_acetone_label() {
        let identification = demo_resolver()
            .identify("Acetone CAS 67-64-1 UN1090")
            .unwrap();
        assert_eq!(identification.extracted.len(), 2);
        assert_eq!(identification.matches.ids(), vec!["chem-acetone"]);
    }

    #[test]
    fn blank_text_makes_no_calls() {
        let result = demo_resolver()
            .resolve("   ", &ExtractionResult::default())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn max_matches_truncates() {
        let resolver = MatchResolver::with_config(
            Arc::new(InMemoryRegistry::demo()),
            ResolverConfig {
                max_matches: Some(1),
            },
        );
        let identification = resolver.identify("67-64-1 and 1310-73-2").unwrap();
        assert_eq!(identification.matches.ids(), vec!["chem-acetone"]);
    }

    #[test]
    fn identification_json_shape() {
        let identification = demo_resolver().identify("UN1823").unwrap();
        let json = serde_json::to_value(&identification).unwrap();
        assert_eq!(json["extracted"]["un"], serde_json::json!(["UN1823"]));
        assert_eq!(json["matches"][0]["id"], "chem-naoh");
        assert_eq!(json["matches"][0]["cas"], "1310-73-2");
    }

    #[test]
    fn call_log_reports_only_total_failure() {
        let mut calls = CallLog::default();
        calls.record("identifier", "67-64-1", Err(RegistryError::Timeout("t".into())));
        calls.record("text", "x", Ok(Vec::new()));
        assert!(calls.unavailable().is_none());

        let mut calls = CallLog::default();
        calls.record("identifier", "67-64-1", Err(RegistryError::Timeout("t".into())));
        calls.record("text", "x", Err(RegistryError::Unavailable("down".into())));
        assert_eq!(
            calls.unavailable(),
            Some(ResolveError::RegistryUnavailable {
                attempts: 2,
                last_error: RegistryError::Unavailable("down".into()),
            })
        );

        assert!(CallLog::default().unavailable().is_none());
    }
}
