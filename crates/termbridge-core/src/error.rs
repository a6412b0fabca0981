use thiserror::Error;

/// Core error types for termbridge operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid {kind} identifier: '{value}'")]
    InvalidIdentifier { kind: String, value: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Create a new InvalidIdentifier error
    pub fn invalid_identifier(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Create a new InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Every core error is caused by caller-supplied data.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidIdentifier { .. } | Self::InvalidInput(_))
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
