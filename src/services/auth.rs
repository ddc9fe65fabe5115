/**
 * Authentication Service
 *
 * Orchestrates sign-in, sign-up, sign-out and refresh on top of
 * [`DatabaseService`], owns the current [`Session`] and publishes every
 * session transition on a broadcast channel.
 *
 * # Session Transitions
 *
 * - signed out -> signed in: successful `sign_in`
 * - signed in -> signed in: successful `refresh_current_user` or `update_current_user`
 * - any -> signed out: `sign_out`
 *
 * A failed sign-in or refresh leaves the session as it was.
 */

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::services::database::DatabaseService;
use crate::services::session::Session;
use crate::services::validation::{validate_sign_in, validate_sign_up};
use crate::shared::config::{AppConfig, ConfigError};
use crate::shared::error::AuthResult;
use crate::shared::event::{self, AuthEventBroadcast, AuthStateChanged};
use crate::shared::user::UserData;

/// Account flows for one application window
pub struct AuthenticationService {
    db: DatabaseService,
    session: Session,
    events: AuthEventBroadcast,
}

impl AuthenticationService {
    /// Create a signed-out service for the configured backend
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_database(DatabaseService::new(config)?))
    }

    pub fn with_database(db: DatabaseService) -> Self {
        Self::with_session(db, Session::SignedOut)
    }

    /// Resume from a session value held elsewhere
    pub fn with_session(db: DatabaseService, session: Session) -> Self {
        Self {
            db,
            session,
            events: event::channel(),
        }
    }

    /// Receive every future session transition
    pub fn subscribe(&self) -> broadcast::Receiver<AuthStateChanged> {
        self.events.subscribe()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Hand the session back to the caller, consuming the service
    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn database(&self) -> &DatabaseService {
        &self.db
    }

    /// Sign in with a username and password.
    ///
    /// Blank input is rejected before any request is made. On success the
    /// session holds the returned user and the transition is both returned
    /// and broadcast. On failure the session is unchanged.
    pub async fn sign_in(&mut self, username: &str, password: &str) -> AuthResult<AuthStateChanged> {
        validate_sign_in(username, password)?;

        match self.db.validate_user_credentials(username, password).await {
            Ok(user) => {
                tracing::info!("[Auth] Sign in successful for user: {}", user.username);
                let change = self.session.establish(user);
                Ok(self.publish(change))
            }
            Err(e) => {
                tracing::warn!("[Auth] Sign in failed for {}: {}", username, e);
                Err(e)
            }
        }
    }

    /// Register a new account.
    ///
    /// Local checks run first (see [`validate_sign_up`]); the session is not
    /// touched, the new user still has to sign in.
    pub async fn sign_up(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
        full_name: Option<&str>,
    ) -> AuthResult<()> {
        validate_sign_up(username, password, email)?;

        self.db
            .create_user(username, password, email, full_name)
            .await
            .inspect(|_| tracing::info!("[Auth] Registered user: {}", username))
            .inspect_err(|e| tracing::warn!("[Auth] Sign up failed for {}: {}", username, e))
    }

    /// Clear the session; always broadcasts a signed-out event
    pub fn sign_out(&mut self) -> AuthStateChanged {
        if let Some(username) = self.session.username() {
            tracing::info!("[Auth] Signing out {}", username);
        }
        let change = self.session.clear();
        self.publish(change)
    }

    /// Reload the signed-in user's record from the backend.
    ///
    /// The login procedure is called with the stored username and an empty
    /// password. Returns `false` when signed out or when the backend does
    /// not confirm the user; the session then stays as it was.
    pub async fn refresh_current_user(&mut self) -> bool {
        let Some(username) = self.session.username().map(str::to_owned) else {
            return false;
        };

        match self.db.validate_user_credentials(&username, "").await {
            Ok(user) => {
                let change = self.session.establish(user);
                self.publish(change);
                true
            }
            Err(e) => {
                tracing::debug!("[Auth] Error refreshing user data: {}", e);
                false
            }
        }
    }

    /// Replace the stored record with an updated copy of the same user
    pub fn update_current_user(&mut self, user: UserData) -> Option<AuthStateChanged> {
        let change = self.session.update(user)?;
        Some(self.publish(change))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<&UserData> {
        self.session.current_user()
    }

    pub fn current_user_id(&self) -> Option<Uuid> {
        self.session.user_id()
    }

    pub fn current_username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn current_user_email(&self) -> Option<&str> {
        self.session.email()
    }

    pub fn current_user_full_name(&self) -> Option<&str> {
        self.session.full_name()
    }

    fn publish(&self, change: AuthStateChanged) -> AuthStateChanged {
        event::broadcast_event(&self.events, change.clone());
        change
    }
}
