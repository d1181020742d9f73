use thiserror::Error;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Missing,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Display name is required")]
    Missing,

    #[error("Display name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role '{0}' (expected lawyer, client or admin)")]
    Unknown(String),
}

/// Error for plaintext password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password is required")]
    Missing,
}

/// Field-level validation failure on registration input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid display name: {0}")]
    DisplayName(#[from] DisplayNameError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),
}

/// Top-level error for all identity and session operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Email already registered: {0}")]
    Conflict(String),

    // Same variant for unknown email and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<auth::JwtError> for IdentityError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::TokenExpired => IdentityError::TokenExpired,
            auth::JwtError::InvalidToken(_) => IdentityError::TokenInvalid,
            auth::JwtError::EncodingFailed(msg) => {
                IdentityError::Internal(format!("Token generation failed: {}", msg))
            }
        }
    }
}

impl From<auth::PasswordError> for IdentityError {
    fn from(err: auth::PasswordError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}

impl From<auth::AuthenticationError> for IdentityError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => IdentityError::InvalidCredentials,
            auth::AuthenticationError::JwtError(e) => e.into(),
            auth::AuthenticationError::PasswordError(e) => e.into(),
            auth::AuthenticationError::InvalidConfiguration(msg) => IdentityError::Internal(msg),
        }
    }
}
