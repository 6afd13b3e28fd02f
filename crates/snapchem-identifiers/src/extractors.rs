//! Identifier extraction from label text

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validators::{is_valid_cas, normalize_un, CasNumber, UnNumber};

/// Kind of identifier found in text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Cas,
    Un,
}

/// Extracted identifier with position information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
    pub start_index: u32,
    pub end_index: u32,
}

/// CAS and UN numbers found in a piece of text.
///
/// Both lists hold unique values in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    cas: Vec<CasNumber>,
    un: Vec<UnNumber>,
}

impl ExtractionResult {
    pub fn cas(&self) -> &[CasNumber] {
        &self.cas
    }

    pub fn un(&self) -> &[UnNumber] {
        &self.un
    }

    pub fn is_empty(&self) -> bool {
        self.cas.is_empty() && self.un.is_empty()
    }

    /// Total number of identifiers of both kinds
    pub fn len(&self) -> usize {
        self.cas.len() + self.un.len()
    }

    /// All identifier values, CAS numbers first, each kind in extraction order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.cas
            .iter()
            .map(CasNumber::as_str)
            .chain(self.un.iter().map(UnNumber::as_str))
    }
}

lazy_static! {
    // CAS registry number: 2-7 digits, 2 digits, check digit
    static ref CAS_REGEX: Regex = Regex::new(r"\b[0-9]{2,7}-[0-9]{2}-[0-9]\b").unwrap();

    // UN number, optionally written with a space or line break ("UN 1090")
    static ref UN_REGEX: Regex = Regex::new(r"(?i)\bUN\s?[0-9]{4}\b").unwrap();
}

/// Extract every CAS and UN number from text
pub fn extract(text: &str) -> ExtractionResult {
    ExtractionResult {
        cas: extract_cas_numbers(text),
        un: extract_un_numbers(text),
    }
}

/// Extract CAS numbers whose check digit is correct
pub fn extract_cas_numbers(text: &str) -> Vec<CasNumber> {
    dedup_in_order(
        CAS_REGEX
            .find_iter(text)
            .filter_map(|m| CasNumber::parse(m.as_str()).ok()),
    )
}

/// Extract UN numbers, normalized to `UN1234`
pub fn extract_un_numbers(text: &str) -> Vec<UnNumber> {
    dedup_in_order(
        UN_REGEX
            .find_iter(text)
            .filter_map(|m| UnNumber::parse(m.as_str()).ok()),
    )
}

/// Extract all identifier occurrences with their byte positions.
///
/// Repeated identifiers are reported at every position.
pub fn extract_all(text: &str) -> Vec<ExtractedIdentifier> {
    let mut results = Vec::new();

    for m in CAS_REGEX.find_iter(text) {
        if is_valid_cas(m.as_str()) {
            results.push(ExtractedIdentifier {
                kind: IdentifierKind::Cas,
                value: m.as_str().to_string(),
                start_index: m.start() as u32,
                end_index: m.end() as u32,
            });
        }
    }

    for m in UN_REGEX.find_iter(text) {
        results.push(ExtractedIdentifier {
            kind: IdentifierKind::Un,
            value: normalize_un(m.as_str()),
            start_index: m.start() as u32,
            end_index: m.end() as u32,
        });
    }

    // Sort by position
    results.sort_by_key(|r| r.start_index);
    results
}

fn dedup_in_order<T, I>(items: I) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cas_strings(text: &str) -> Vec<String> {
        extract_cas_numbers(text)
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn un_strings(text: &str) -> Vec<String> {
        extract_un_numbers(text)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_extract_acetone_label() {
        let result = extract("Acetone CAS 67-64-1 UN1090");
        assert_eq!(result.cas()[0].as_str(), "67-64-1");
        assert_eq!(result.un()[0].as_str(), "UN1090");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_bad_check_digit_rejected() {
        assert!(cas_strings("CAS 67-64-2").is_empty());
    }

    #[test]
    fn test_cas_dedup_keeps_first_seen_order() {
        let text = "7732-18-5, 67-64-1; again 7732-18-5";
        assert_eq!(cas_strings(text), vec!["7732-18-5", "67-64-1"]);
    }

    #[test]
    fn test_cas_needs_word_boundary() {
        assert!(cas_strings("ref 67-64-15").is_empty());
        assert!(cas_strings("x67-64-1").is_empty());
        assert_eq!(cas_strings("(67-64-1)"), vec!["67-64-1"]);
    }

    #[test]
    fn test_un_variants() {
        assert_eq!(un_strings("un1090 / UN 2014"), vec!["UN1090", "UN2014"]);
        assert_eq!(un_strings("UN1090 UN1090 un1090"), vec!["UN1090"]);
        assert_eq!(un_strings("UN\n1090"), vec!["UN1090"]);
    }

    #[test]
    fn test_un_needs_word_boundaries() {
        assert!(un_strings("RUN1090").is_empty());
        assert!(un_strings("UN10900").is_empty());
        assert!(un_strings("UN109").is_empty());
    }

    #[test]
    fn test_extract_all_positions() {
        let text = "UN1823 sodium hydroxide 1310-73-2";
        let ids = extract_all(text);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].kind, IdentifierKind::Un);
        assert_eq!(ids[0].start_index, 0);
        assert_eq!(ids[1].kind, IdentifierKind::Cas);
        let span = ids[1].start_index as usize..ids[1].end_index as usize;
        assert_eq!(&text[span], "1310-73-2");
    }

    #[test]
    fn test_identifiers_lists_cas_first() {
        let result = extract("UN1090 then 67-64-1");
        let ids: Vec<&str> = result.identifiers().collect();
        assert_eq!(ids, vec!["67-64-1", "UN1090"]);
    }

    #[test]
    fn test_empty_text() {
        let result = extract("");
        assert!(result.is_empty());
        assert_eq!(result, ExtractionResult::default());
    }

    #[test]
    fn test_extraction_result_json_shape() {
        let json = serde_json::to_value(extract("67-64-1 UN1090")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "cas": ["67-64-1"], "un": ["UN1090"] })
        );
    }
}
