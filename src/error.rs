//! Error types for lattice construction, lookups and decomposition queries.

use crate::lattice::MAX_SOURCES;

/// Errors raised by the lattice and the decomposition engine.
///
/// Unknown but well-formed lattice specifications are not errors: lookups
/// return `None` for those.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PidError {
    #[error("unsupported number of sources: {requested} (must be between 1 and {max})")]
    UnsupportedSourceCount { requested: usize, max: usize },

    #[error("invalid alphabet size {size} for {what}")]
    InvalidAlphabet { what: String, size: usize },

    #[error("history length must be 1 or greater, got {0}")]
    InvalidHistoryLength(usize),

    #[error("malformed specification '{spec}': {reason}")]
    MalformedSpec { spec: String, reason: String },

    #[error("node id {id} does not belong to this lattice")]
    ForeignNode { id: usize },

    #[error("element id {id} does not belong to this lattice")]
    ForeignElement { id: usize },

    #[error("element id {id} out of range (lattice has {count} elements)")]
    ElementIdOutOfRange { id: usize, count: usize },

    #[error("{what} value {value} out of range for alphabet size {base}")]
    ValueOutOfRange { what: String, value: usize, base: usize },

    #[error("observation has {actual} source values, expected {expected}")]
    SourceCountMismatch { expected: usize, actual: usize },

    #[error("batch has {targets} target values but {sources} source rows")]
    LengthMismatch { targets: usize, sources: usize },

    #[error("invalid observations: {0}")]
    InvalidObservations(String),

    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),
}

impl PidError {
    pub(crate) fn unsupported_sources(requested: usize) -> Self {
        PidError::UnsupportedSourceCount { requested, max: MAX_SOURCES }
    }

    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        PidError::MalformedSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PidError>;
