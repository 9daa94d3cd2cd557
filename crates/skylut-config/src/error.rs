//! Configuration error types.

/// Errors that can occur when loading, saving, or validating atmosphere parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the parameter file from disk.
    #[error("failed to read parameters: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the parameter file to disk.
    #[error("failed to write parameters: {0}")]
    WriteError(#[source] std::io::Error),

    /// JSON content is malformed or a field is missing.
    #[error("failed to parse parameters: {0}")]
    ParseError(#[source] serde_json::Error),

    /// RON content is malformed or a field is missing.
    #[error("failed to parse parameters: {0}")]
    RonParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize parameters to JSON.
    #[error("failed to serialize parameters: {0}")]
    SerializeError(#[source] serde_json::Error),

    /// Failed to serialize parameters to RON.
    #[error("failed to serialize parameters: {0}")]
    RonSerializeError(#[source] ron::Error),

    /// A field parsed correctly but lies outside its physical domain.
    #[error("invalid parameter `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
