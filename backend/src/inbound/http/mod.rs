//! HTTP inbound adapter exposing the gateway endpoints.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use tracing::debug;

use crate::domain::Error;

pub mod error;
pub mod forward;
pub mod health;
pub mod login;
pub mod state;

pub use error::ApiResult;

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected unreadable JSON body");
    Error::invalid_request("request body must be a JSON object").into()
}

/// Register the gateway endpoints on an application.
///
/// The catch-all forwarding route is registered last so fixed paths such as
/// `/login` and the health checks take precedence.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(login::login)
        .service(health::ready)
        .service(health::live)
        .service(forward::forward);
}
