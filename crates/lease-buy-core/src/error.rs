use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseBuyError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {field} — {reason}")]
    Configuration { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LeaseBuyError {
    /// Name of the offending input field, if the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            LeaseBuyError::InvalidInput { field, .. }
            | LeaseBuyError::Configuration { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LeaseBuyError {
    fn from(e: serde_json::Error) -> Self {
        LeaseBuyError::SerializationError(e.to_string())
    }
}
