use thiserror::Error;

/// Contract violations of the calculation engine.
///
/// User-facing form checks live in [`crate::validation`] instead.
#[derive(Debug, Error)]
pub enum DealerError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Malformed JSON handed over by a caller
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DealerError {
    fn from(e: serde_json::Error) -> Self {
        DealerError::SerializationError(e.to_string())
    }
}
