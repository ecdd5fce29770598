//! Error taxonomy for the per-document pipeline

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that fail a single document
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Markup that cannot be numbered or flattened
    #[error("Structural violation: {0}")]
    StructuralViolation(String),

    /// Stage presence cannot be reconstructed
    #[error("Presence invariant violation: {0}")]
    PresenceInvariantViolation(String),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
