//! Account Services
//!
//! Client-side account flows for the desktop app.
//!
//! - **`database`** - HTTP client for the backend's user procedures and table
//! - **`auth`** - `AuthenticationService`, session owner and event publisher
//! - **`session`** - signed-in / signed-out session value
//! - **`validation`** - credential and email checks
//! - **`password`** - bcrypt hashing
//! - **`forms`** - login page form normalization

pub mod auth;
pub mod database;
pub mod forms;
pub mod password;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use auth::AuthenticationService;
pub use database::DatabaseService;
pub use session::Session;
