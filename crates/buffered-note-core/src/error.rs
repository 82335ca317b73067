use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for NoteError {
    fn from(e: serde_json::Error) -> Self {
        NoteError::SerializationError(e.to_string())
    }
}
