//! Shared helpers for gateway integration tests.
//!
//! Tests drive the real handlers, verifier and forwarder. Only the network
//! is replaced, by [`StubTransport`], so no test reaches a third party.

use std::sync::{Arc, Mutex};

use actix_web::{App, web};
use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use gateway::Trace;
use gateway::domain::ports::{UpstreamResponse, UpstreamTransport, UpstreamTransportError};
use gateway::domain::{CredentialVerifier, Forwarder, RouteTable, UpstreamSecrets, UserDirectory};
use gateway::inbound::http::health::HealthState;
use gateway::inbound::http::state::HttpState;
use gateway::outbound::password::SchemeAwarePasswordVerifier;

/// Canned reply the stub returns for every request.
#[derive(Clone)]
pub enum StubReply {
    Json { status: u16, body: &'static str },
    Refused,
}

/// Transport double recording every URL it is asked for.
pub struct StubTransport {
    reply: StubReply,
    calls: Mutex<Vec<Url>>,
}

impl StubTransport {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl UpstreamTransport for StubTransport {
    async fn get(&self, url: &Url) -> Result<UpstreamResponse, UpstreamTransportError> {
        self.calls.lock().expect("calls lock").push(url.clone());
        match &self.reply {
            StubReply::Json { status, body } => Ok(UpstreamResponse {
                status: *status,
                body: Bytes::from_static(body.as_bytes()),
            }),
            StubReply::Refused => Err(UpstreamTransportError::transport(
                "connection refused by 10.0.0.1 with token=leaked",
            )),
        }
    }
}

/// Low bcrypt cost keeps the suite fast; the verifier reads it from the hash.
pub fn bcrypt_hash(password: &str) -> String {
    bcrypt::hash(password, 4).expect("bcrypt hash")
}

/// User list holding alice with `Hash("secret")`.
pub fn alice_users_json() -> String {
    serde_json::json!([{ "username": "alice", "passwordHash": bcrypt_hash("secret") }]).to_string()
}

pub fn all_secrets() -> UpstreamSecrets {
    UpstreamSecrets::default()
        .with_secret("inventory_token", Some("inv-token".to_owned()))
        .with_secret("fanart_api_key", Some("fa-key".to_owned()))
        .with_secret("discogs_token", Some("dg-token".to_owned()))
}

/// Assemble handler state over the real services.
pub fn gateway_state(
    users_json: Option<&str>,
    secrets: UpstreamSecrets,
    transport: Arc<StubTransport>,
) -> HttpState {
    let directory = match users_json {
        Some(raw) => UserDirectory::from_json(raw),
        None => Err(gateway::domain::UserDirectoryError::Missing),
    };
    let verifier = CredentialVerifier::new(directory, Arc::new(SchemeAwarePasswordVerifier));
    let routes = RouteTable::standard().expect("built-in routes are valid");
    let forwarder = Forwarder::new(Arc::new(routes), Arc::new(secrets), transport);
    HttpState::new(Arc::new(verifier), Arc::new(forwarder))
}

/// Application matching the production wiring minus CORS and Swagger.
pub fn gateway_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HealthState::new()))
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(gateway::inbound::http::configure)
}
