/**
 * Backend Database Client
 *
 * HTTP client for the hosted REST backend that stores user accounts.
 *
 * # Endpoints
 *
 * - `POST /rest/v1/rpc/fn_user_login` - credential check, returns login rows
 * - `POST /rest/v1/rpc/fn_check_user_exists` - duplicate username/email check
 * - `POST /rest/v1/users` - insert a new user row
 * - `PATCH /rest/v1/users?id=eq.{id}` - stamp `last_login_at`
 *
 * Every request carries the `apikey`, bearer `Authorization` and
 * `Prefer: return=representation` headers.
 *
 * # Error Handling
 *
 * Every failure comes back as an [`AuthError`]; nothing is retried.
 * The last-login update runs detached and its outcome is only logged.
 */

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::services::password::hash_password;
use crate::shared::config::{AppConfig, ConfigError};
use crate::shared::error::{AuthError, AuthResult};
use crate::shared::user::{LoginResult, UserData};

pub const LOGIN_RPC_PATH: &str = "/rest/v1/rpc/fn_user_login";
pub const CHECK_USER_EXISTS_RPC_PATH: &str = "/rest/v1/rpc/fn_check_user_exists";
pub const USERS_PATH: &str = "/rest/v1/users";

const APIKEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    p_username: &'a str,
    p_password: &'a str,
}

#[derive(Debug, Serialize)]
struct CheckUserExistsRequest<'a> {
    p_username: &'a str,
    p_email: &'a str,
}

#[derive(Debug, Serialize)]
struct NewUserRow<'a> {
    username: &'a str,
    password_hash: &'a str,
    email: &'a str,
    full_name: &'a str,
}

#[derive(Debug, Serialize)]
struct LastLoginUpdate {
    last_login_at: DateTime<Utc>,
}

/// Client for the account tables and remote procedures
#[derive(Debug, Clone)]
pub struct DatabaseService {
    client: Client,
    config: AppConfig,
}

impl DatabaseService {
    /// Build a client with the backend's authentication headers preset
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let invalid_key = |e: reqwest::header::InvalidHeaderValue| ConfigError::InvalidValue {
            key: "api_key",
            message: e.to_string(),
        };
        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(invalid_key)?;
        api_key.set_sensitive(true);
        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(invalid_key)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(APIKEY_HEADER), api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            HeaderName::from_static(PREFER_HEADER),
            HeaderValue::from_static(RETURN_REPRESENTATION),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        tracing::debug!("[Database] Client ready for {}", config.backend_url);
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check a username/password pair with the login procedure.
    ///
    /// Succeeds only when the first returned row has status `0` and an id.
    /// On success the user's `last_login_at` is stamped in the background.
    pub async fn validate_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<UserData> {
        tracing::info!("[Database] Attempting login for user: {}", username);

        let request = LoginRequest {
            p_username: username,
            p_password: password,
        };
        let response = self
            .client
            .post(self.config.api_url(LOGIN_RPC_PATH))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("[Database] Login response status: {}", status);

        if !status.is_success() {
            tracing::warn!("[Database] Login failed - HTTP {}", status);
            return Err(AuthError::rejected(format!(
                "Login failed: {}",
                body_or_status(&body, status)
            )));
        }

        let rows: Option<Vec<LoginResult>> = serde_json::from_str(&body)?;
        let first = rows.unwrap_or_default().into_iter().next();
        if let Some(row) = &first {
            tracing::debug!(
                "[Database] Login status: {}, user id: {:?}",
                row.login_status,
                row.id
            );
        }

        let Some(user) = first.and_then(|row| row.into_user(username)) else {
            tracing::info!("[Database] Login failed - invalid credentials for {}", username);
            return Err(AuthError::InvalidCredentials);
        };

        self.spawn_last_login_update(user.id);
        tracing::info!("[Database] Login successful for {}", user.username);
        Ok(user)
    }

    /// Ask the backend whether `username` or `email` is already taken
    pub async fn check_user_exists(&self, username: &str, email: &str) -> AuthResult<bool> {
        let request = CheckUserExistsRequest {
            p_username: username,
            p_email: email,
        };
        let response = self
            .client
            .post(self.config.api_url(CHECK_USER_EXISTS_RPC_PATH))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!("[Database] Duplicate check failed - HTTP {}", status);
            return Err(AuthError::rejected(format!(
                "Duplicate check failed: {}",
                body_or_status(&body, status)
            )));
        }

        Ok(serde_json::from_str::<bool>(body.trim())?)
    }

    /// Register a new user.
    ///
    /// The password is bcrypt-hashed locally; only the hash leaves the
    /// process. A missing full name is stored as an empty string.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
        full_name: Option<&str>,
    ) -> AuthResult<()> {
        if self.check_user_exists(username, email).await? {
            tracing::info!("[Database] Registration rejected, {} already exists", username);
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hash_off_executor(password).await?;
        let row = NewUserRow {
            username,
            password_hash: &password_hash,
            email,
            full_name: full_name.unwrap_or_default(),
        };

        let response = self
            .client
            .post(self.config.api_url(USERS_PATH))
            .json(&row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("[Database] User insert failed - HTTP {}", status);
            return Err(AuthError::rejected(format!(
                "Failed to create user: {}",
                body_or_status(&body, status)
            )));
        }

        tracing::info!("[Database] Created user {}", username);
        Ok(())
    }

    /// Run bcrypt on the blocking pool, off the async worker threads
    async fn hash_off_executor(&self, password: &str) -> AuthResult<String> {
        let password = password.to_owned();
        let cost = self.config.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Stamp `last_login_at` without making the caller wait.
    ///
    /// Outside a tokio runtime the update is skipped.
    fn spawn_last_login_update(&self, user_id: Uuid) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("[Database] No runtime, skipping last_login_at update");
            return;
        };

        let client = self.client.clone();
        let url = format!("{}?id=eq.{}", self.config.api_url(USERS_PATH), user_id);
        handle.spawn(async move {
            let update = LastLoginUpdate {
                last_login_at: Utc::now(),
            };
            match client.patch(&url).json(&update).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("[Database] Updated last_login_at for {}", user_id);
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::warn!(
                        "[Database] Failed to update last_login_at: {}",
                        body_or_status(&body, status)
                    );
                }
                Err(e) => {
                    tracing::warn!("[Database] Error updating last_login_at: {}", e);
                }
            }
        });
    }
}

/// Response body for error messages, or the status line when it is empty
fn body_or_status(body: &str, status: StatusCode) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}
