//! Error types for querygrid

use thiserror::Error;

/// Result type alias using QueryGridError
pub type Result<T> = std::result::Result<T, QueryGridError>;

/// Error type alias for convenience
pub type Error = QueryGridError;

/// Main error type for querygrid
#[derive(Debug, Error)]
pub enum QueryGridError {
    /// A registry key was registered twice within one role.
    #[error("{role} type '{name}' is already registered")]
    DuplicateRegistration { role: &'static str, name: String },

    /// A declaration referenced a registry key that was never registered.
    #[error("{role} type '{name}' is unknown")]
    UnknownType { role: &'static str, name: String },

    /// A plugin violated its role's structural contract at registration time.
    #[error("Conformance error: {0}")]
    Conformance(String),

    /// Two registries or builders could not be merged.
    #[error("Overlap error: {0}")]
    Overlap(String),

    /// The declarative spec is structurally invalid or a component failed
    /// to construct from its declared config.
    #[error("Spec schema error: {0}")]
    Schema(String),

    /// Cross-component type compatibility check failed at assembly time.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// The model client transport failed or returned unusable content.
    #[error("Model response error: {0}")]
    ModelResponse(String),

    /// The model's structured response does not conform to the query schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error raised by a search engine or aggregator implementation.
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
