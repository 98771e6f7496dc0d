use thiserror::Error;

/// Application-wide error types for HBnB.
#[derive(Error, Debug)]
pub enum AppError {
    /// A requested entity or association does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Missing, malformed, expired or forged bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Login rejected. Deliberately carries no detail about which check failed.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Request payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// Password hashing or hash parsing failed.
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Token could not be encoded.
    #[error("Token error: {0}")]
    Token(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if the error is caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_)
                | AppError::Unauthorized(_)
                | AppError::InvalidCredentials
                | AppError::Validation(_)
                | AppError::SerializationError(_)
        )
    }
}
