//! Login handler.
//!
//! ```text
//! POST /login {"username":"alice","password":"secret"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::credential_verifier::login_validation_error;
use crate::domain::{Error, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /login`.
///
/// Both fields are optional at the wire level so a missing field is reported
/// as `invalid_request` rather than a JSON decoding failure. The legacy
/// `usuario`/`contrasena` keys are accepted as aliases.
#[derive(Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default, alias = "usuario")]
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[serde(default, alias = "contrasena")]
    #[schema(example = "secret")]
    pub password: Option<String>,
}

/// Body returned on a successful login.
#[derive(Debug, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct LoginResponse {
    #[schema(example = "ok")]
    pub message: String,
}

impl LoginResponse {
    fn ok() -> Self {
        Self {
            message: "ok".to_owned(),
        }
    }
}

/// Check a username/password pair against the configured user list.
///
/// No session or token is issued; success is the confirmation itself.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "User list missing or unusable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        username.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(|err| login_validation_error(&err))?;
    state.login.authenticate(&credentials).await?;
    Ok(web::Json(LoginResponse::ok()))
}
