//! In-memory chemical registry
//!
//! Records are kept in catalog order. Catalog files are TOML with one
//! `[[chemical]]` table per record:
//!
//! ```toml
//! [[chemical]]
//! id = "chem-acetone"
//! name = "Acetone"
//! synonyms = ["Propanone"]
//! cas = "67-64-1"
//! un = "UN1090"
//! ppe = ["Goggles", "Gloves"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use snapchem_domain::{
    has_errors, validate_chemical, ChemicalRecord, ValidationError, ValidationSeverity,
};
use tracing::Level;

use crate::config::RegistryConfig;
use crate::error::CatalogError;
use crate::registry::{ChemicalRegistry, RegistryError};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "chemical")]
    chemicals: Vec<ChemicalRecord>,
}

/// Registry over a fixed list of records
#[derive(Debug, Clone)]
pub struct InMemoryRegistry {
    records: Vec<ChemicalRecord>,
    list_limit: usize,
    text_limit: Option<usize>,
}

impl InMemoryRegistry {
    pub fn new(records: Vec<ChemicalRecord>) -> Self {
        let defaults = RegistryConfig::default();
        Self {
            records,
            list_limit: defaults.list_limit,
            text_limit: defaults.text_limit,
        }
    }

    /// Set how many records empty and non-empty text queries return
    pub fn with_limits(mut self, list_limit: usize, text_limit: Option<usize>) -> Self {
        self.list_limit = list_limit;
        self.text_limit = text_limit;
        self
    }

    /// Parse a TOML catalog, rejecting duplicate ids and invalid records
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: CatalogFile = toml::from_str(content)?;

        let mut seen = HashSet::new();
        for record in &catalog.chemicals {
            let issues = validate_chemical(record);
            if has_errors(&issues) {
                let message = issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(CatalogError::InvalidRecord {
                    id: record.id.clone(),
                    message,
                });
            }
            for issue in &issues {
                log_issue(&record.id, issue);
            }
            if !seen.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }

        Ok(Self::new(catalog.chemicals))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
        let registry = Self::from_toml_str(&content)?;
        tracing::info!("Loaded {} chemicals from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// Build the registry described by the config: the catalog file when one
    /// is set, the demo catalog otherwise
    pub fn from_config(config: &RegistryConfig) -> Result<Self, CatalogError> {
        let registry = match &config.catalog_path {
            Some(path) => Self::load(path)?,
            None => Self::demo(),
        };
        Ok(registry.with_limits(config.list_limit, config.text_limit))
    }

    pub fn records(&self) -> &[ChemicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The three-chemical demo catalog
    pub fn demo() -> Self {
        Self::new(vec![
            ChemicalRecord {
                pictograms: strings(&["GHS02", "GHS07"]),
                where_to_use: strings(&[
                    "Cleaning / degreasing",
                    "Solvent for resins and adhesives",
                ]),
                when_not_to_use: strings(&["Near ignition sources", "With strong oxidizers"]),
                how_to_use: strings(&[
                    "Use in well-ventilated area or fume hood",
                    "Wear splash goggles and suitable gloves",
                    "Keep container tightly closed; ground/bond when transferring",
                ]),
                ppe: strings(&["Goggles", "Gloves", "Lab coat"]),
                storage: strings(&[
                    "Flammables cabinet",
                    "Keep away from heat/sparks/open flames",
                ]),
                first_aid: strings(&[
                    "Fresh air if inhaled",
                    "Rinse skin with water",
                    "Rinse eyes for several minutes",
                ]),
                ..ChemicalRecord::new("chem-acetone", "Acetone")
                    .with_synonyms(["Propanone", "Dimethyl ketone"])
                    .with_cas("67-64-1")
                    .with_un("UN1090")
            },
            ChemicalRecord {
                pictograms: strings(&["GHS03", "GHS05", "GHS07"]),
                where_to_use: strings(&[
                    "Oxidizing agent",
                    "Disinfection (industrial protocols)",
                ]),
                when_not_to_use: strings(&[
                    "With organics/solvents",
                    "With metals/contaminants",
                    "In closed container after contamination",
                ]),
                how_to_use: strings(&[
                    "Wear face shield or goggles, chemical-resistant gloves",
                    "Use secondary containment; keep away from combustibles",
                    "Do not return unused solution to original container",
                ]),
                ppe: strings(&["Goggles/face shield", "Chemical-resistant gloves", "Apron"]),
                storage: strings(&[
                    "Cool, vented area",
                    "Away from combustibles and reducing agents",
                ]),
                first_aid: strings(&[
                    "Flush eyes/skin with water",
                    "Seek medical attention for exposure",
                ]),
                ..ChemicalRecord::new("chem-h2o2-30", "Hydrogen peroxide 30%")
                    .with_synonyms(["H2O2 30%", "Peroxide solution"])
                    .with_cas("7722-84-1")
                    .with_un("UN2014")
            },
            ChemicalRecord {
                pictograms: strings(&["GHS05"]),
                where_to_use: strings(&["pH adjustment", "Cleaning (alkaline)"]),
                when_not_to_use: strings(&[
                    "With acids (violent heat)",
                    "With aluminum (hydrogen gas)",
                ]),
                how_to_use: strings(&[
                    "Add NaOH to water slowly (never water to NaOH) when dissolving",
                    "Wear eye protection and gloves",
                    "Use corrosion-resistant containers",
                ]),
                ppe: strings(&["Goggles", "Gloves", "Lab coat"]),
                storage: strings(&["Corrosives cabinet", "Keep container dry and sealed"]),
                first_aid: strings(&[
                    "Rinse immediately with water; remove contaminated clothing",
                    "Get medical advice",
                ]),
                ..ChemicalRecord::new("chem-naoh", "Sodium hydroxide")
                    .with_synonyms(["Caustic soda", "Lye"])
                    .with_cas("1310-73-2")
                    .with_un("UN1823")
            },
        ])
    }
}

impl ChemicalRegistry for InMemoryRegistry {
    fn find_by_text(&self, query: &str) -> Result<Vec<ChemicalRecord>, RegistryError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(self.records.iter().take(self.list_limit).cloned().collect());
        }

        // A record hits when the query is part of it, or when it is named in the query
        let mut hits: Vec<(u32, &ChemicalRecord)> = self
            .records
            .iter()
            .filter_map(|record| {
                let score = record.label_score(&query);
                if score > 0 || record.search_haystack().contains(&query) {
                    Some((score, record))
                } else {
                    None
                }
            })
            .collect();

        // Stable: equal scores keep catalog order
        hits.sort_by(|a, b| b.0.cmp(&a.0));

        let limit = self.text_limit.unwrap_or(hits.len());
        Ok(hits
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn find_all(&self) -> Result<Vec<ChemicalRecord>, RegistryError> {
        Ok(self.records.clone())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<ChemicalRecord>, RegistryError> {
        Ok(self.records.iter().find(|record| record.id == id).cloned())
    }
}

/// Log level for a catalog validation issue that did not reject the record
fn issue_level(severity: ValidationSeverity) -> Level {
    match severity {
        ValidationSeverity::Error => Level::ERROR,
        ValidationSeverity::Warning => Level::WARN,
        ValidationSeverity::Info => Level::DEBUG,
    }
}

fn log_issue(id: &str, issue: &ValidationError) {
    let level = issue_level(issue.severity);
    if level == Level::ERROR {
        tracing::error!(id, "catalog record: {}", issue);
    } else if level == Level::WARN {
        tracing::warn!(id, "catalog record: {}", issue);
    } else {
        tracing::debug!(id, "catalog record: {}", issue);
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
