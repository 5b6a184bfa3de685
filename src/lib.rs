//! Symptom Matcher
//!
//! Fuzzy disease matching over a static symptom catalog:
//! - `catalog`: disease records, symptom vocabulary (Polars CSV loading)
//! - `matcher`: normalized edit-similarity scoring (strsim)
//! - `resolver`: symptom resolution and greeting detection
//! - `greetings`: phrase -> canned-response table with built-in fallback
//!
//! The engine is read-only after construction: indices are built once at
//! startup and shared freely across concurrent resolutions.

pub mod catalog;
pub mod greetings;
pub mod matcher;
pub mod resolver;

// Re-export commonly used types
pub use catalog::{CatalogIndex, CatalogRow, DataLoadError, DiseaseRecord};
pub use greetings::GreetingTable;
pub use matcher::{normalize, FuzzyMatcher};
pub use resolver::{
    detect_greeting, resolve_symptoms, MatchResult, GREETING_ACCEPT_THRESHOLD,
    SYMPTOM_ACCEPT_THRESHOLD,
};
