//! Error types for weblock-core operations.

/// All errors that can occur in weblock-core operations.
#[derive(Debug, thiserror::Error)]
pub enum WeblockError {
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using WeblockError.
pub type Result<T> = std::result::Result<T, WeblockError>;

// Conversion for string error compatibility
impl From<WeblockError> for String {
    fn from(err: WeblockError) -> String {
        err.to_string()
    }
}
