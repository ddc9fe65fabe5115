//! Login page form handling.
//!
//! Normalizes the raw text of the sign-in and sign-up forms before it is
//! handed to [`AuthenticationService`](crate::services::auth::AuthenticationService).
//! Registration is limited to Gmail addresses at this layer.

use crate::services::validation::is_valid_email;
use crate::shared::error::{AuthError, AuthResult};

pub const GMAIL_SUFFIX: &str = "@gmail.com";

const REQUIRED_FIELDS: &str = "Please fill in all required fields.";

/// Raw sign-in form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
}

/// Trimmed sign-in credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInFields {
    pub username: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> AuthResult<SignInFields> {
        let username = self.username.trim();
        let password = self.password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::validation(REQUIRED_FIELDS));
        }
        Ok(SignInFields {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Raw sign-up form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub full_name: String,
}

/// Sign-up fields ready for `AuthenticationService::sign_up`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpFields {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl SignUpForm {
    pub fn validate(&self) -> AuthResult<SignUpFields> {
        let credentials = SignInForm {
            username: self.username.clone(),
            password: self.password.clone(),
        }
        .validate()?;

        if self.email.trim().is_empty() {
            return Err(AuthError::validation("Email address is required."));
        }
        if !is_valid_gmail_address(&self.email) {
            return Err(AuthError::validation("Please enter a valid Gmail address."));
        }
        if self.confirm_password.trim().is_empty() {
            return Err(AuthError::validation("Please confirm your password."));
        }
        if credentials.password != self.confirm_password {
            return Err(AuthError::validation(
                "Passwords do not match. Please ensure both password fields are identical.",
            ));
        }

        let full_name = self.full_name.trim();
        Ok(SignUpFields {
            username: credentials.username,
            password: credentials.password,
            email: self.email.trim().to_string(),
            full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
        })
    }
}

/// Valid address ending in `@gmail.com` (suffix compared case-insensitively)
pub fn is_valid_gmail_address(email: &str) -> bool {
    let has_suffix = email.len() > GMAIL_SUFFIX.len()
        && email
            .get(email.len() - GMAIL_SUFFIX.len()..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(GMAIL_SUFFIX));
    has_suffix && is_valid_email(email)
}

/// Autocomplete a partially typed email to a Gmail address.
///
/// Returns `None` when the input is empty or already has an `@`.
pub fn complete_gmail_address(input: &str) -> Option<String> {
    if input.is_empty() || input.contains('@') {
        return None;
    }
    Some(format!("{}{}", input, GMAIL_SUFFIX))
}
