//! DataWizard - Account Library
//!
//! Sign-in, sign-up and session handling for the DataWizard desktop app,
//! backed by a hosted PostgREST/Supabase REST API.
//!
//! # Module Structure
//!
//! - **`shared`** - configuration, error types, user records, state events
//! - **`services`** - `DatabaseService` (HTTP), `AuthenticationService`
//!   (session owner), validation, password hashing and form helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use datawizard::services::AuthenticationService;
//! use datawizard::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let mut auth = AuthenticationService::new(config)?;
//! let mut changes = auth.subscribe();
//!
//! match auth.sign_in("alice", "secret1").await {
//!     Ok(change) => println!("signed in: {}", change.is_authenticated),
//!     Err(e) => eprintln!("{}: {}", e.title(), e),
//! }
//! # let _ = changes.try_recv();
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Every account operation returns `Result<_, AuthError>`; transport
//! failures are values, never panics.

/// Shared types and configuration
pub mod shared;

/// Account services
pub mod services;
