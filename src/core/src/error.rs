use thiserror::Error;

/// dockgen error types
#[derive(Error, Debug)]
pub enum DockgenError {
    /// Builder finalized in a state that cannot produce a Dockerfile
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Build file has an unusable shape
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// YAML/JSON decoding error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for DockgenError {
    fn from(err: serde_json::Error) -> Self {
        DockgenError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DockgenError {
    fn from(err: serde_yaml::Error) -> Self {
        DockgenError::SerializationError(err.to_string())
    }
}

/// Result type alias for dockgen operations
pub type Result<T> = std::result::Result<T, DockgenError>;
