//! Shared Module
//!
//! Types used across the account services: configuration, errors,
//! user records and session state notifications.

/// Application configuration
pub mod config;

/// Error types
pub mod error;

/// Session state notifications
pub mod event;

/// User records and login wire types
pub mod user;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{AuthError, AuthResult, ErrorCategory};
pub use event::AuthStateChanged;
pub use user::{LoginResult, UserData};
