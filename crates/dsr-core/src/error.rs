use thiserror::Error;

#[derive(Debug, Error)]
pub enum DsrError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Advice unavailable: {0}")]
    AdviceUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DsrError {
    fn from(e: serde_json::Error) -> Self {
        DsrError::SerializationError(e.to_string())
    }
}
