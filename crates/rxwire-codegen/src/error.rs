//! Error types for code generation

use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during code generation
///
/// These abort a whole pass or a single type's synthesis. Problems with
/// individual artifacts are reported as [`Diagnostic`](crate::Diagnostic)s
/// instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The catalog could not be listed
    #[error("failed to read type catalog: {0}")]
    Catalog(#[from] rxwire_core::Error),

    /// Invalid header template
    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] minijinja::Error),

    /// Failed to generate Rust code
    #[error("code generation failed: {0}")]
    GenerationError(String),

    /// The sink could not store an artifact
    #[error("failed to write artifact '{file}': {message}")]
    SinkError {
        /// Artifact file name
        file: String,
        /// Error description
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
