//! Driven port for comparing a password against a stored hash.
//!
//! The stored hash names its own algorithm; adapters decide which schemes
//! they understand and report anything else as an error rather than a
//! mismatch.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while checking a password against a stored hash.
    pub enum PasswordHashError {
        /// The stored hash names an algorithm the adapter cannot verify.
        UnsupportedScheme { scheme: String } =>
            "unsupported password hash scheme: {scheme}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } =>
            "malformed password hash: {message}",
        /// The verification task did not complete.
        Worker { message: String } =>
            "password verification worker failed: {message}",
    }
}

/// Port for password-hash comparison.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHashVerifier: Send + Sync {
    /// Return `true` when `password` hashes to `stored_hash`.
    ///
    /// A mismatch is `Ok(false)`; errors are reserved for hashes that cannot
    /// be evaluated at all.
    async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
