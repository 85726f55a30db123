//! Error types for doodates-temporal operations.
//!
//! Resolution itself never fails (unrecognized or impossible input degrades
//! to an empty, low-confidence result). These errors cover the fallible
//! edges: custom vocabularies, recurrence expansion, reference dates and
//! interpreter payloads.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Recurrence error: {0}")]
    Recurrence(String),

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
}

pub type Result<T> = std::result::Result<T, ResolverError>;
