//! Server-held secrets substituted into upstream URLs.
//!
//! Values come from process configuration only, never from callers. They are
//! zeroed on drop and `Debug` lists names without values.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroizing;

/// Immutable map of secret name to value.
///
/// # Examples
/// ```
/// use gateway::domain::UpstreamSecrets;
///
/// let secrets = UpstreamSecrets::default()
///     .with_secret("discogs_token", Some("abc".to_owned()))
///     .with_secret("fanart_api_key", None);
/// assert_eq!(secrets.resolve("discogs_token"), Some("abc"));
/// assert_eq!(secrets.resolve("fanart_api_key"), None);
/// ```
#[derive(Clone, Default)]
pub struct UpstreamSecrets {
    values: BTreeMap<String, Zeroizing<String>>,
}

impl UpstreamSecrets {
    /// Record a secret; `None` leaves it unconfigured.
    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.values.insert(name.into(), Zeroizing::new(value));
        }
        self
    }

    /// Non-empty value for `name`, if configured.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|value| value.as_str())
            .filter(|value| !value.trim().is_empty())
    }

    /// Names that resolve to a usable value.
    pub fn configured_names(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|name| self.resolve(name).is_some())
    }
}

impl fmt::Debug for UpstreamSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamSecrets")
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
