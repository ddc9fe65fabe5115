//! Shared Error Types
//!
//! This module defines the error type returned by every account operation.
//! Nothing in the services panics or lets a transport failure escape as
//! anything other than an `AuthError` value.
//!
//! # Error Categories
//!
//! - **Validation** - input rejected before any network call
//! - **Rejected** - the backend answered, but refused the request
//!   (bad credentials, duplicate user, non-success status)
//! - **Transport** - the request or its response could not be processed
//!   (network failure, undecodable body, hashing failure)
//!
//! # Usage
//!
//! ```rust
//! use datawizard::shared::error::{AuthError, ErrorCategory};
//!
//! let error = AuthError::validation("Username is required");
//! assert_eq!(error.category(), ErrorCategory::Validation);
//! assert_eq!(error.to_string(), "Username is required");
//! ```
use thiserror::Error;

/// Result alias used by the account services
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors produced by sign-in, sign-up and refresh.
///
/// `Display` yields the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Local input validation failed
    #[error("{0}")]
    Validation(String),

    /// Login endpoint answered but the credentials were not accepted
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Username or email is already registered
    #[error("Username or email already exists")]
    AlreadyExists,

    /// Backend returned a non-success status; carries the formatted message
    #[error("{0}")]
    Rejected(String),

    /// Network or HTTP-layer failure
    #[error("Database error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Database error: {0}")]
    Decode(String),

    /// Password hashing failed
    #[error("Database error: {0}")]
    Hashing(String),
}

/// Coarse classification of an [`AuthError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Rejected,
    Transport,
}

impl AuthError {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::InvalidCredentials | Self::AlreadyExists | Self::Rejected(_) => {
                ErrorCategory::Rejected
            }
            Self::Transport(_) | Self::Decode(_) | Self::Hashing(_) => ErrorCategory::Transport,
        }
    }

    /// Title for the dialog that reports this error
    pub fn title(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Validation Error",
            ErrorCategory::Rejected => "Request Failed",
            ErrorCategory::Transport => "Connection Error",
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Hashing(err.to_string())
    }
}
