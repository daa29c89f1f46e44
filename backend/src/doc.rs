//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates the login, forwarding and health endpoints together
//! with the error envelope. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::login::{LoginRequest, LoginResponse};

/// OpenAPI document for the gateway.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory gateway API",
        description = "Credential check and relay of whitelisted third-party JSON APIs.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::login::login,
        crate::inbound::http::forward::forward,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode, LoginRequest, LoginResponse)),
    tags(
        (name = "auth", description = "Credential verification"),
        (name = "upstream", description = "Relayed third-party APIs"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
