//! Error types for the `clinrag` crate.

use thiserror::Error;

/// Errors that can occur while answering a clinical question.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An error occurred while computing the question embedding.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the chunk store backend.
    #[error("Retrieval error ({store}): {message}")]
    Retrieval {
        /// The chunk store backend that produced the error.
        store: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the completion gateway.
    #[error("Completion error ({provider}): {message}")]
    Completion {
        /// The completion provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An audit-log write failed.
    ///
    /// Never surfaced by the engine itself; audit failures are swallowed at
    /// the boundary and reported via `tracing::warn!` only.
    #[error("Audit log error: {0}")]
    Audit(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
