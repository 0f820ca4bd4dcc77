//! Error types for SpatMorph

use thiserror::Error;

use crate::field::FieldKind;

/// Main error type for SpatMorph operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed or inconsistent coordinate/topology input
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Structuring element geometry that cannot be realized on the topology
    #[error("Invalid structuring element: {0}")]
    InvalidShape(String),

    #[error("Structuring element resolves to an empty neighbor set at every site")]
    EmptyStructuringElement,

    /// Operator applied to a field kind it does not support
    #[error("{operation} does not support {kind} fields")]
    TypeMismatch {
        operation: &'static str,
        kind: FieldKind,
    },

    /// Stage-to-stage kind mismatch detected by the pipeline engine
    #[error("Stage {index} ({stage}) expects {expected} input, got {found}")]
    PipelineType {
        index: usize,
        stage: String,
        expected: String,
        found: String,
    },

    /// Unrecognized stage name or malformed stage parameters
    #[error("Stage {index}: unknown or malformed stage '{name}': {reason}")]
    UnknownStage {
        index: usize,
        name: String,
        reason: String,
    },

    #[error("Site index {site} out of bounds for lattice of {len} sites")]
    SiteOutOfBounds { site: usize, len: usize },

    #[error("Field size mismatch: lattice has {expected} sites, got {actual} values")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Fields are defined on different lattices")]
    LatticeMismatch,

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias for SpatMorph operations
pub type Result<T> = std::result::Result<T, Error>;
