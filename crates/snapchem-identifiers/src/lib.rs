//! Identifier extraction and validation for chemical labels
//!
//! This crate recognises the two identifier kinds printed on chemical
//! container labels and safety sheets:
//! - CAS registry numbers (`7732-18-5`), validated with the mod-10 check digit
//! - UN transport numbers (`UN1090`), validated syntactically
//!
//! Extraction is a pure function of the input text. It never fails; text
//! without identifiers simply yields an empty [`ExtractionResult`].

pub mod extractors;
pub mod validators;

pub use extractors::*;
pub use validators::*;
