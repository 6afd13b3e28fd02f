//! Validation for chemical records

use super::ChemicalRecord;
use serde::{Deserialize, Serialize};
use snapchem_identifiers::{is_valid_cas, is_valid_un, normalize_cas};

/// Severity of a validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

/// A validation error or warning
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a chemical record and return errors/warnings
pub fn validate_chemical(record: &ChemicalRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Required fields
    if record.id.trim().is_empty() {
        errors.push(ValidationError {
            field: "id".to_string(),
            message: "Record id is required".to_string(),
            severity: ValidationSeverity::Error,
        });
    }

    if record.name.trim().is_empty() {
        errors.push(ValidationError {
            field: "name".to_string(),
            message: "Name is required".to_string(),
            severity: ValidationSeverity::Error,
        });
    }

    // Identifiers are optional but should be well-formed when present
    if let Some(cas) = &record.cas {
        if !is_valid_cas(&normalize_cas(cas)) {
            errors.push(ValidationError {
                field: "cas".to_string(),
                message: format!("'{}' is not a valid CAS number", cas),
                severity: ValidationSeverity::Warning,
            });
        }
    }

    if let Some(un) = &record.un {
        if !is_valid_un(un.trim()) {
            errors.push(ValidationError {
                field: "un".to_string(),
                message: format!("'{}' is not a valid UN number", un),
                severity: ValidationSeverity::Warning,
            });
        }
    }

    if record.cas.is_none() && record.un.is_none() {
        errors.push(ValidationError {
            field: "cas".to_string(),
            message: "Record has no CAS or UN number; only text search can find it".to_string(),
            severity: ValidationSeverity::Info,
        });
    }

    errors
}

/// Whether any issue is severe enough to reject the record
pub fn has_errors(issues: &[ValidationError]) -> bool {
    issues
        .iter()
        .any(|issue| issue.severity == ValidationSeverity::Error)
}
