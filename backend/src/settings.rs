//! Gateway settings loaded via OrthoConfig.
//!
//! Values come from `GATEWAY_*` environment variables, an optional config
//! file and CLI flags. They are read once in `main` and converted into the
//! immutable domain objects handed to services.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::route_spec::{
    DISCOGS_TOKEN_SECRET, FANART_API_KEY_SECRET, INVENTORY_TOKEN_SECRET,
};
use crate::domain::{UpstreamSecrets, UserDirectory, UserDirectoryError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Process configuration for the gateway.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GATEWAY")]
pub struct GatewaySettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// Inline JSON array of user records.
    pub users_json: Option<String>,
    /// File holding the JSON user list; used when `users_json` is unset.
    pub users_file: Option<PathBuf>,
    pub inventory_token: Option<String>,
    pub fanart_api_key: Option<String>,
    pub discogs_token: Option<String>,
    /// Per-request upstream timeout in seconds.
    pub upstream_timeout_secs: Option<u64>,
    /// Comma-separated list of allowed browser origins.
    pub cors_allowed_origins: Option<String>,
    /// Spend a dummy hash comparison when a user is absent.
    #[ortho_config(default = false)]
    pub equalize_login_timing: bool,
}

impl GatewaySettings {
    /// Interface to bind, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind, falling back to 3000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Upstream timeout; never shorter than one second.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(
            self.upstream_timeout_secs
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Allowed CORS origins. Empty means any origin is accepted.
    pub fn cors_allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Load the user list from `users_json`, else from `users_file`.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Missing`] when neither source is set,
    /// [`UserDirectoryError::Unreadable`] when the file cannot be read and
    /// [`UserDirectoryError::Malformed`] when the JSON does not parse.
    pub fn user_directory(&self) -> Result<UserDirectory, UserDirectoryError> {
        if let Some(raw) = self.users_json.as_deref().filter(|raw| !raw.trim().is_empty()) {
            return UserDirectory::from_json(raw);
        }
        let Some(path) = self.users_file.as_ref() else {
            return Err(UserDirectoryError::Missing);
        };
        let raw = std::fs::read_to_string(path).map_err(|err| UserDirectoryError::Unreadable {
            message: format!("{}: {err}", path.display()),
        })?;
        UserDirectory::from_json(&raw)
    }

    /// Secrets referenced by the built-in route table.
    pub fn upstream_secrets(&self) -> UpstreamSecrets {
        UpstreamSecrets::default()
            .with_secret(INVENTORY_TOKEN_SECRET, self.inventory_token.clone())
            .with_secret(FANART_API_KEY_SECRET, self.fanart_api_key.clone())
            .with_secret(DISCOGS_TOKEN_SECRET, self.discogs_token.clone())
    }
}

fn presence(value: Option<&String>) -> &'static str {
    match value {
        Some(_) => "<set>",
        None => "<unset>",
    }
}

impl fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("users_json", &presence(self.users_json.as_ref()))
            .field("users_file", &self.users_file)
            .field("inventory_token", &presence(self.inventory_token.as_ref()))
            .field("fanart_api_key", &presence(self.fanart_api_key.as_ref()))
            .field("discogs_token", &presence(self.discogs_token.as_ref()))
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("equalize_login_timing", &self.equalize_login_timing)
            .finish()
    }
}
