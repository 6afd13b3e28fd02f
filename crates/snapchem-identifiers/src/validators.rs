//! Identifier validation functions and validated identifier types

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // CAS shape: 2-7 digits, 2 digits, 1 check digit
    static ref CAS_PATTERN: Regex = Regex::new(r"^[0-9]{2,7}-[0-9]{2}-[0-9]$").unwrap();

    // UN number: "UN" + 4 digits, one optional whitespace character in between
    static ref UN_PATTERN: Regex = Regex::new(r"(?i)^UN\s?[0-9]{4}$").unwrap();
}

/// Errors from parsing a validated identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("Invalid CAS number: {0}")]
    InvalidCas(String),

    #[error("Invalid UN number: {0}")]
    InvalidUn(String),
}

/// Compute the CAS check digit for the digits preceding it.
///
/// Hyphens are ignored. Digits are weighted 1, 2, 3, ... starting from the
/// rightmost one; the check digit is the weighted sum modulo 10.
///
/// Returns `None` if the body holds anything other than ASCII digits and
/// hyphens.
pub fn cas_check_digit(body: &str) -> Option<u32> {
    let mut sum = 0u32;
    let mut weight = 1u32;
    for b in body.bytes().rev() {
        match b {
            b'0'..=b'9' => {
                sum += u32::from(b - b'0') * weight;
                weight += 1;
            }
            b'-' => {}
            _ => return None,
        }
    }
    Some(sum % 10)
}

/// Check that a string is a well-formed CAS number with a correct check digit
pub fn is_valid_cas(cas: &str) -> bool {
    if !CAS_PATTERN.is_match(cas) {
        return false;
    }

    let Some((body, check)) = cas.rsplit_once('-') else {
        return false;
    };

    check
        .chars()
        .next()
        .filter(char::is_ascii_digit)
        .and_then(|c| c.to_digit(10))
        .is_some_and(|digit| Some(digit) == cas_check_digit(body))
}

/// Check that a string is a well-formed UN number
pub fn is_valid_un(un: &str) -> bool {
    UN_PATTERN.is_match(un)
}

/// Normalize a CAS number by trimming surrounding whitespace
pub fn normalize_cas(cas: &str) -> String {
    cas.trim().to_string()
}

/// Normalize a UN number to the `UN1234` form
pub fn normalize_un(un: &str) -> String {
    un.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// A CAS registry number that has passed the check-digit test
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CasNumber(String);

impl CasNumber {
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let normalized = normalize_cas(value);
        if is_valid_cas(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(IdentifierError::InvalidCas(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing check digit
    pub fn check_digit(&self) -> u32 {
        self.0
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .unwrap_or_default()
    }
}

/// A UN number in normalized `UN1234` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnNumber(String);

impl UnNumber {
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let trimmed = value.trim();
        if is_valid_un(trimmed) {
            Ok(Self(normalize_un(trimmed)))
        } else {
            Err(IdentifierError::InvalidUn(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The four digits without the `UN` prefix
    pub fn digits(&self) -> &str {
        &self.0[2..]
    }
}

macro_rules! string_identifier_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $ty {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

string_identifier_impls!(CasNumber);
string_identifier_impls!(UnNumber);
