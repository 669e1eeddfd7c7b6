//! Error types for rxwire-core

use thiserror::Error;

/// Result type alias for rxwire-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rxwire-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// Catalog root does not exist
    #[error("catalog not found: {path}")]
    CatalogNotFound {
        /// Path that was searched
        path: String,
    },

    /// A catalog file could not be parsed
    #[error("failed to parse catalog file '{path}': {message}")]
    CatalogParse {
        /// Catalog file path
        path: String,
        /// Parser error description
        message: String,
    },

    /// Header template does not compile
    #[error("template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
