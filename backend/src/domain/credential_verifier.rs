//! Credential verification against the configured user list.
//!
//! Lookup is first-match-wins on an exact username. The password is compared
//! with whatever scheme the stored hash names, through the
//! [`PasswordHashVerifier`] port.
//!
//! Unknown usernames and records without a hash are rejected without a hash
//! comparison unless a timing dummy is installed, in which case the password
//! is checked against the dummy and the result discarded so both rejection
//! paths cost the same.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{LoginService, PasswordHashError, PasswordHashVerifier};
use crate::domain::{
    Error, LoginCredentials, LoginValidationError, UserDirectory, UserDirectoryError, UserRecord,
};

/// Result of checking one set of credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Username or password was missing.
    MalformedRequest(LoginValidationError),
    /// The user list cannot be used or the comparison could not run.
    ConfigurationError(String),
    /// No matching user, or the password did not match the stored hash
    /// (including hashes in an unknown or corrupt format).
    Rejected,
    /// The password matched the stored hash.
    Accepted,
}

/// Caller-facing message shared by every rejection.
pub const REJECTED_MESSAGE: &str = "invalid username or password";

/// Map a credential validation failure onto a client error.
pub fn login_validation_error(err: &LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyUsername => ("username", "empty_username"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Verifier over an immutable user directory.
pub struct CredentialVerifier<H> {
    directory: Result<UserDirectory, UserDirectoryError>,
    hashes: Arc<H>,
    timing_dummy: Option<String>,
}

impl<H> CredentialVerifier<H> {
    /// Create a verifier. A directory error is kept and reported on every
    /// login attempt instead of failing startup.
    pub fn new(directory: Result<UserDirectory, UserDirectoryError>, hashes: Arc<H>) -> Self {
        Self {
            directory,
            hashes,
            timing_dummy: None,
        }
    }

    /// Compare against `dummy_hash` when no stored hash is available.
    #[must_use]
    pub fn with_timing_dummy(mut self, dummy_hash: String) -> Self {
        self.timing_dummy = Some(dummy_hash);
        self
    }
}

impl<H> CredentialVerifier<H>
where
    H: PasswordHashVerifier,
{
    /// Check raw username/password input.
    ///
    /// Missing fields short-circuit before the directory is consulted.
    pub async fn verify(&self, username: &str, password: &str) -> VerificationOutcome {
        match LoginCredentials::try_from_parts(username, password) {
            Ok(credentials) => self.verify_credentials(&credentials).await,
            Err(err) => VerificationOutcome::MalformedRequest(err),
        }
    }

    /// Check already validated credentials.
    pub async fn verify_credentials(&self, credentials: &LoginCredentials) -> VerificationOutcome {
        let directory = match &self.directory {
            Ok(directory) => directory,
            Err(err) => return VerificationOutcome::ConfigurationError(err.to_string()),
        };

        let Some(stored_hash) = directory
            .find(credentials.username())
            .and_then(UserRecord::password_hash)
        else {
            self.spend_dummy_comparison(credentials.password()).await;
            return VerificationOutcome::Rejected;
        };

        match self.hashes.verify(credentials.password(), stored_hash).await {
            Ok(true) => VerificationOutcome::Accepted,
            Ok(false) => VerificationOutcome::Rejected,
            // A hash nothing can match is a failed comparison, not an outage.
            Err(
                err @ (PasswordHashError::UnsupportedScheme { .. }
                | PasswordHashError::MalformedHash { .. }),
            ) => {
                error!(
                    username = credentials.username(),
                    error = %err,
                    "stored password hash cannot be compared; rejecting login"
                );
                VerificationOutcome::Rejected
            }
            Err(err @ PasswordHashError::Worker { .. }) => {
                VerificationOutcome::ConfigurationError(format!(
                    "password comparison for {} failed: {err}",
                    credentials.username()
                ))
            }
        }
    }

    async fn spend_dummy_comparison(&self, password: &str) {
        if let Some(dummy) = &self.timing_dummy {
            let _discarded = self.hashes.verify(password, dummy).await;
        }
    }
}

#[async_trait]
impl<H> LoginService for CredentialVerifier<H>
where
    H: PasswordHashVerifier,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<(), Error> {
        let username = credentials.username();
        match self.verify_credentials(credentials).await {
            VerificationOutcome::Accepted => {
                info!(username, "login accepted");
                Ok(())
            }
            VerificationOutcome::Rejected => {
                info!(username, "login rejected");
                Err(Error::unauthorized(REJECTED_MESSAGE))
            }
            VerificationOutcome::MalformedRequest(err) => Err(login_validation_error(&err)),
            VerificationOutcome::ConfigurationError(detail) => {
                error!(username, error = %detail, "login unavailable: user configuration is invalid");
                Err(Error::internal(detail))
            }
        }
    }
}

#[cfg(test)]
#[path = "credential_verifier_tests.rs"]
mod tests;
