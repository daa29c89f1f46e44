//! Gateway entry-point: loads settings, wires services and serves HTTP.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gateway::inbound::http::health::HealthState;
use gateway::settings::GatewaySettings;
use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = GatewaySettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    debug!(settings = ?settings, "settings loaded");

    let http_state = build_http_state(&settings)?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        http_state,
        ServerConfig::from_settings(&settings),
    )?;
    server.await
}
