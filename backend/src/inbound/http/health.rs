//! Liveness and readiness checks for orchestrators and load balancers.
//!
//! The gateway has no downstream dependency worth probing per request, so
//! both checks report flags flipped by the server lifecycle: ready once the
//! listener is bound, not live once shutdown has begun.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Lifecycle flags read by the health checks.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    draining: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Start live but not ready.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            draining: AtomicBool::new(false),
        }
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Report shutdown: liveness fails and readiness follows.
    pub fn mark_unhealthy(&self) {
        self.draining.store(true, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        !self.draining.load(Ordering::Acquire)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire) && self.is_alive()
    }
}

fn health_reply(passing: bool) -> HttpResponse {
    let mut builder = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness check.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Listener bound and accepting traffic"),
        (status = 503, description = "Starting up or shutting down")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    health_reply(state.is_ready())
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is running"),
        (status = 503, description = "Shutdown in progress")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    health_reply(state.is_alive())
}
