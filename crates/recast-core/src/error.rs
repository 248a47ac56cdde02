//! Error types for recast-core

use thiserror::Error;

/// Result type alias for recast-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by a transformer's `run`.
///
/// The engine never wraps these; they reach the caller exactly as the
/// transformer produced them.
pub type RunError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in recast-core
#[derive(Error, Debug)]
pub enum Error {
    /// Input is neither a single record nor a collection of records
    #[error("only records and collections of records can be transformed, got {found}")]
    UnsupportedInputKind {
        /// Description of the rejected input
        found: String,
    },

    /// A collection was supplied without an explicit transformer
    #[error("collections require a transformer to be explicitly set")]
    TransformerRequiredForSet,

    /// The active group has no mapping for the record's type
    #[error("a default transformer has not been supplied for '{record_type}' in group '{group}'")]
    NoDefaultTransformer {
        /// Type identifier of the record
        record_type: String,
        /// Group that was searched
        group: String,
    },

    /// The supplied or resolved transformer cannot transform this record type
    #[error("transformer '{transformer}' is not supported: {message}")]
    InvalidTransformer {
        /// Identifier of the transformer
        transformer: String,
        /// Why it was rejected
        message: String,
    },

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

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
