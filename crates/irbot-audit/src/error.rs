//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while persisting audit entries.
///
/// These never reach request handlers; the logger reports them to the
/// diagnostic log instead.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The writer task is no longer running.
    #[error("audit writer unavailable")]
    WriterUnavailable,
}
