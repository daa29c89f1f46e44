//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when login payload values are missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or empty.
    EmptyUsername,
    /// Password was missing or empty.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "missing required field: username"),
            Self::EmptyPassword => write!(f, "missing required field: password"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the credential verifier.
///
/// ## Invariants
/// - `username` is non-empty and kept exactly as supplied, whitespace
///   included, because user lookup is an exact, case-sensitive match.
/// - `password` is non-empty, zeroed on drop and never shown by `Debug`.
///
/// # Examples
/// ```
/// use gateway::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "secret").unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert!(!format!("{creds:?}").contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
