//! Forwarding handler for the whitelisted upstream routes.
//!
//! ```text
//! GET /inventory
//! GET /artist-art?mbid=<musicbrainz id>
//! GET /release-search?q=<search terms>
//! ```

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use tracing::error;

use crate::domain::forwarder::upstream_failure;
use crate::domain::{Error, QueryParams};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Relay a whitelisted route to its upstream and return the JSON unchanged.
///
/// Any JSON reply is answered with 200, even when the upstream reported an
/// error status; the upstream body is passed through untouched.
#[utoipa::path(
    get,
    path = "/{route}",
    params(
        ("route" = String, Path, description = "Route name: inventory, artist-art or release-search"),
        ("mbid" = Option<String>, Query, description = "MusicBrainz id; required by artist-art"),
        ("q" = Option<String>, Query, description = "Search terms; required by release-search")
    ),
    responses(
        (status = 200, description = "Upstream JSON relayed unchanged, whatever the upstream status", body = serde_json::Value),
        (status = 400, description = "Required query parameter missing", body = Error),
        (status = 404, description = "Unknown route", body = Error),
        (status = 500, description = "Upstream failed or is not configured", body = Error)
    ),
    tags = ["upstream"],
    operation_id = "forwardRoute"
)]
#[get("/{route}")]
pub async fn forward(
    state: web::Data<HttpState>,
    route: web::Path<String>,
    query: web::Query<QueryParams>,
) -> ApiResult<HttpResponse> {
    let route = route.into_inner();
    let params = query.into_inner();
    let result = state.forwarding.forward(&route, &params).await?;
    let status = StatusCode::from_u16(result.status()).map_err(|err| {
        error!(route = %route, status = result.status(), error = %err, "forward result carries an invalid status");
        upstream_failure(&route)
    })?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::json())
        .body(result.body().get().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockForwardingService, MockLoginService, MockUpstreamTransport, UpstreamResponse,
    };
    use crate::domain::route_spec::FANART_API_KEY_SECRET;
    use crate::domain::{ForwardResult, Forwarder, RouteTable, UpstreamSecrets};
    use bytes::Bytes;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::value::RawValue;
    use std::sync::Arc;

    const RELEASES: &str = r#"{"results": [ {"title":"Discovery"} ]}"#;

    fn raw(body: &str) -> Box<RawValue> {
        RawValue::from_string(body.to_owned()).expect("valid JSON")
    }

    async fn send_get(forwarding: MockForwardingService, uri: &str) -> (StatusCode, Option<String>, String) {
        let state = HttpState::new(Arc::new(MockLoginService::new()), Arc::new(forwarding));
        send_get_with(state, uri).await
    }

    async fn send_get_with(state: HttpState, uri: &str) -> (StatusCode, Option<String>, String) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::inbound::http::configure),
        )
        .await;
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = actix_test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).expect("utf8 body");
        (status, content_type, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn relays_body_byte_for_byte() {
        let mut forwarding = MockForwardingService::new();
        forwarding
            .expect_forward()
            .withf(|route, params| {
                route == "release-search" && params.get("q").map(String::as_str) == Some("daft punk")
            })
            .times(1)
            .returning(|_, _| Ok(ForwardResult::new(200, raw(RELEASES))));

        let (status, content_type, body) = send_get(forwarding, "/release-search?q=daft+punk").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, RELEASES);
    }

    #[rstest]
    #[actix_web::test]
    async fn upstream_error_status_is_answered_with_ok() {
        const REJECTION: &str = r#"{"status":"error","error message":"Invalid API key"}"#;
        let mut transport = MockUpstreamTransport::new();
        transport.expect_get().times(1).returning(|_| {
            Ok(UpstreamResponse {
                status: 401,
                body: Bytes::from_static(REJECTION.as_bytes()),
            })
        });
        let secrets = UpstreamSecrets::default()
            .with_secret(FANART_API_KEY_SECRET, Some("fa-key".to_owned()));
        let forwarder = Forwarder::new(
            Arc::new(RouteTable::standard().expect("built-in routes")),
            Arc::new(secrets),
            Arc::new(transport),
        );
        let state = HttpState::new(Arc::new(MockLoginService::new()), Arc::new(forwarder));

        let (status, _, body) = send_get_with(state, "/artist-art?mbid=abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, REJECTION);
    }

    #[rstest]
    #[case(Error::invalid_request("missing required field: q"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("unknown route: nope"), StatusCode::NOT_FOUND)]
    #[case(
        Error::upstream_failure("failed to query inventory upstream"),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[actix_web::test]
    async fn domain_errors_map_to_status(#[case] error: Error, #[case] expected: StatusCode) {
        let mut forwarding = MockForwardingService::new();
        let message = error.message().to_owned();
        forwarding
            .expect_forward()
            .times(1)
            .returning(move |_, _| Err(error.clone()));

        let (status, _, body) = send_get(forwarding, "/inventory").await;

        assert_eq!(status, expected);
        let decoded: Error = serde_json::from_str(&body).expect("error envelope");
        assert_eq!(decoded.message(), message);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_is_not_a_forwarded_route() {
        let mut forwarding = MockForwardingService::new();
        forwarding
            .expect_forward()
            .withf(|route, _| route == "login")
            .times(1)
            .returning(|route, _| Err(Error::not_found(format!("unknown route: {route}"))));

        let (status, _, _) = send_get(forwarding, "/login").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
