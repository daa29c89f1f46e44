//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing how
//! users are stored or how hashes are compared. Handler tests substitute a
//! test double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials against the configured user list.
    ///
    /// Unknown users and wrong passwords both yield the same
    /// [`crate::domain::ErrorCode::Unauthorized`] error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<(), Error>;
}
