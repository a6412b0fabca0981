//! Core terminology types shared by the termbridge crates.
//!
//! - [`Concept`], [`TargetCode`] and [`MappingResult`] model search hits and
//!   SNOMED CT to ICD-10 mappings.
//! - [`ValueSetSummary`] and [`ValueSetConcept`] model VSAC value sets.
//! - [`codes`] holds the ICD-10 range expansion and deduplication helpers.

pub mod codes;
pub mod concept;
pub mod error;
pub mod id;
pub mod value_set;

pub use codes::{MAX_RANGE_SPAN, dedupe_codes, expand_range, is_range, split_range};
pub use concept::{Concept, MappingResult, TargetCode, systems};
pub use error::{CoreError, Result};
pub use id::validate_identifier;
pub use value_set::{ValueSetConcept, ValueSetSummary};
