//! Statically configured user list consulted by the credential verifier.
//!
//! The list is parsed once at startup and never mutated. Records keep the
//! order of the source so lookups are first-match-wins when a username is
//! duplicated.

use serde::Deserialize;

/// One configured user: a username and its salted password hash.
///
/// The JSON form accepts `username`/`passwordHash` and the legacy
/// `usuario`/`hash` keys.
///
/// # Examples
/// ```
/// use gateway::domain::UserRecord;
///
/// let record = UserRecord::new("alice", Some("$2b$04$abc".to_owned()));
/// assert_eq!(record.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    // Records without a username stay in the list but never match.
    #[serde(default, alias = "usuario")]
    username: String,
    #[serde(default, alias = "hash")]
    password_hash: Option<String>,
}

impl UserRecord {
    /// Build a record from a username and an optional stored hash.
    pub fn new(username: impl Into<String>, password_hash: Option<String>) -> Self {
        Self {
            username: username.into(),
            password_hash,
        }
    }

    /// Username matched exactly against login attempts.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Stored password hash; blank hashes count as absent.
    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash
            .as_deref()
            .filter(|hash| !hash.trim().is_empty())
    }
}

/// Reasons the configured user list cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// No user list was configured.
    #[error("user list is not configured")]
    Missing,
    /// The user list could not be read from its source.
    #[error("user list could not be read: {message}")]
    Unreadable { message: String },
    /// The user list is not a JSON array of user records.
    #[error("user list is malformed: {message}")]
    Malformed { message: String },
}

/// Ordered, immutable collection of [`UserRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    records: Vec<UserRecord>,
}

impl UserDirectory {
    /// Wrap already-parsed records, preserving their order.
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of user records.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::UserDirectory;
    ///
    /// let directory =
    ///     UserDirectory::from_json(r#"[{"usuario":"alice","hash":"$2b$04$x"}]"#).unwrap();
    /// assert!(directory.find("alice").is_some());
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, UserDirectoryError> {
        let records: Vec<UserRecord> =
            serde_json::from_str(raw).map_err(|err| UserDirectoryError::Malformed {
                message: err.to_string(),
            })?;
        Ok(Self::new(records))
    }

    /// First record whose username equals `username` exactly.
    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.records
            .iter()
            .find(|record| !record.username.is_empty() && record.username == username)
    }

    /// Number of configured records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no users are configured.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
