//! HTTP server configuration object and helpers.

use gateway::settings::GatewaySettings;

/// Listener and browser-facing settings for the HTTP server.
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Derive the server configuration from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &GatewaySettings) -> Self {
        Self {
            host: settings.host().to_owned(),
            port: settings.port(),
            cors_allowed_origins: settings.cors_allowed_origins(),
        }
    }
}
