//! Password hashing.
//!
//! Registration never sends a plaintext password: it is hashed with bcrypt
//! (salted, adaptive) on the client and only the hash is stored.

use crate::shared::error::AuthResult;

/// Hash `password` with a fresh salt at `cost`
pub fn hash_password(password: &str, cost: u32) -> AuthResult<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check `password` against a stored bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> AuthResult<bool> {
    Ok(bcrypt::verify(password, password_hash)?)
}
