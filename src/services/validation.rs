//! Input validation for sign-in and sign-up.
//!
//! Sign-up checks run in a fixed order and the first failure wins:
//! username, password, email presence, email format, password length.

use crate::shared::error::{AuthError, AuthResult};

/// Minimum accepted password length, in UTF-16 code units
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Reject blank sign-in credentials before any request is made
pub fn validate_sign_in(username: &str, password: &str) -> AuthResult<()> {
    if is_blank(username) {
        return Err(AuthError::validation("Username is required"));
    }
    if is_blank(password) {
        return Err(AuthError::validation("Password is required"));
    }
    Ok(())
}

/// Sign-up field checks, in contract order
pub fn validate_sign_up(username: &str, password: &str, email: &str) -> AuthResult<()> {
    if is_blank(username) {
        return Err(AuthError::validation("Username is required"));
    }
    if is_blank(password) {
        return Err(AuthError::validation("Password is required"));
    }
    if is_blank(email) {
        return Err(AuthError::validation("Email is required"));
    }
    if !is_valid_email(email) {
        return Err(AuthError::validation("Invalid email format"));
    }
    if password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Plain `local@domain` address check.
///
/// The address must already be in canonical form: no surrounding or
/// embedded whitespace, no display name, exactly one `@`, a non-empty
/// local part and a domain made of non-empty dot-separated labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    if email.contains(['<', '>', '(', ')', ',', ';', '"']) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}
