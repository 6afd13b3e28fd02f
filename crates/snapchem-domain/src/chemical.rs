//! Chemical record domain model

use serde::{Deserialize, Serialize};
use snapchem_identifiers::{normalize_cas, normalize_un, CasNumber, UnNumber};

/// Label score weights for each kind of hit
pub const CAS_HIT_SCORE: u32 = 100;
pub const UN_HIT_SCORE: u32 = 80;
pub const NAME_HIT_SCORE: u32 = 60;
pub const SYNONYM_HIT_SCORE: u32 = 30;

/// A chemical known to the registry, with handling guidance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemicalRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub cas: Option<String>,
    #[serde(default)]
    pub un: Option<String>,
    /// GHS pictogram codes (GHS02, GHS05, ...)
    #[serde(default)]
    pub pictograms: Vec<String>,

    // Handling guidance
    #[serde(default)]
    pub where_to_use: Vec<String>,
    #[serde(default)]
    pub when_not_to_use: Vec<String>,
    #[serde(default)]
    pub how_to_use: Vec<String>,
    #[serde(default)]
    pub ppe: Vec<String>,
    #[serde(default)]
    pub storage: Vec<String>,
    #[serde(default)]
    pub first_aid: Vec<String>,
}

impl ChemicalRecord {
    /// Create a record with only its id and display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            synonyms: Vec::new(),
            cas: None,
            un: None,
            pictograms: Vec::new(),
            where_to_use: Vec::new(),
            when_not_to_use: Vec::new(),
            how_to_use: Vec::new(),
            ppe: Vec::new(),
            storage: Vec::new(),
            first_aid: Vec::new(),
        }
    }

    pub fn with_cas(mut self, cas: impl Into<String>) -> Self {
        self.cas = Some(cas.into());
        self
    }

    pub fn with_un(mut self, un: impl Into<String>) -> Self {
        self.un = Some(un.into());
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the stored CAS number equals `cas` after normalization
    pub fn has_cas(&self, cas: &CasNumber) -> bool {
        self.cas
            .as_deref()
            .is_some_and(|stored| normalize_cas(stored) == cas.as_str())
    }

    /// Whether the stored UN number equals `un` after normalization
    pub fn has_un(&self, un: &UnNumber) -> bool {
        self.un
            .as_deref()
            .is_some_and(|stored| normalize_un(stored) == un.as_str())
    }

    /// Lowercased text searched by free-text queries: name, synonyms, CAS and UN
    pub fn search_haystack(&self) -> String {
        let mut parts: Vec<&str> = vec![self.name.as_str()];
        parts.extend(self.synonyms.iter().map(String::as_str));
        parts.push(self.cas.as_deref().unwrap_or(""));
        parts.push(self.un.as_deref().unwrap_or(""));
        parts.join(" ").to_lowercase()
    }

    /// Score how strongly a piece of label text mentions this record.
    ///
    /// Zero means the text mentions none of the record's terms.
    pub fn label_score(&self, text: &str) -> u32 {
        let text = text.to_lowercase();
        let mentions = |term: &str| {
            let term = term.trim();
            !term.is_empty() && text.contains(&term.to_lowercase())
        };

        let mut score = 0;
        if self.cas.as_deref().is_some_and(mentions) {
            score += CAS_HIT_SCORE;
        }
        if self.un.as_deref().is_some_and(mentions) {
            score += UN_HIT_SCORE;
        }
        if mentions(self.name.as_str()) {
            score += NAME_HIT_SCORE;
        }
        let synonym_hits = self
            .synonyms
            .iter()
            .filter(|s| mentions(s.as_str()))
            .count() as u32;
        score + synonym_hits * SYNONYM_HIT_SCORE
    }
}
