//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub(crate) use state_builders::build_http_state;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use std::future::Future;

use tracing::{info, warn};

use gateway::Trace;
#[cfg(debug_assertions)]
use gateway::doc::ApiDoc;
use gateway::inbound::http::health::HealthState;
use gateway::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const CORS_MAX_AGE_SECS: usize = 3600;

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }
    allowed_origins.iter().fold(
        Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(CORS_MAX_AGE_SECS),
        |cors, origin| cors.allowed_origin(origin),
    )
}

/// Fail the health checks once `shutdown` resolves.
async fn drain_on_shutdown<F>(health_state: web::Data<HealthState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    shutdown.await;
    info!("shutdown requested; failing health checks");
    health_state.mark_unhealthy();
}

async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "cannot listen for shutdown signal; health checks will not drain");
        std::future::pending::<()>().await;
    }
}

/// Construct the HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        host,
        port,
        cors_allowed_origins,
    } = config;
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .wrap(build_cors(&cors_allowed_origins));

        // Registered before the catch-all forwarding route.
        #[cfg(debug_assertions)]
        let app = app
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app.configure(gateway::inbound::http::configure)
    })
    .bind((host.as_str(), port))?
    .run();

    info!(%host, port, "gateway listening");
    health_state.mark_ready();
    actix_web::rt::spawn(drain_on_shutdown(health_state, ctrl_c()));
    Ok(server)
}
