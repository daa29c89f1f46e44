//! Generic upstream forwarder shared by every proxied route.
//!
//! One implementation serves the whole [`RouteTable`]: it checks caller
//! parameters, resolves secrets, renders the upstream URL, issues a single GET
//! and relays the JSON reply. Every failure after validation collapses into
//! one caller-facing error naming only the route.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;
use serde_json::value::RawValue;
use tracing::{debug, error, warn};
use url::Url;

use crate::domain::ports::{ForwardingService, UpstreamTransport};
use crate::domain::{Error, RouteSpec, RouteTable, UpstreamSecrets};

/// Caller-supplied query parameters.
pub type QueryParams = HashMap<String, String>;

/// Everything except RFC 3986 unreserved characters is escaped, so a value is
/// safe in both path segments and query strings.
const CALLER_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Status returned to callers whenever the upstream answered with JSON.
///
/// Upstream statuses are logged, never relayed: a 401 from a third party must
/// not read as the gateway rejecting the caller.
pub const RELAYED_STATUS: u16 = 200;

/// Reply handed back to the caller.
///
/// The body is validated as JSON but kept as the upstream's exact text.
#[derive(Debug, Clone)]
pub struct ForwardResult {
    status: u16,
    body: Box<RawValue>,
}

impl ForwardResult {
    /// Pair a caller-facing status with a JSON body.
    pub fn new(status: u16, body: Box<RawValue>) -> Self {
        Self { status, body }
    }

    /// Status to answer the caller with.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Upstream JSON body.
    pub fn body(&self) -> &RawValue {
        &self.body
    }
}

impl PartialEq for ForwardResult {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.body.get() == other.body.get()
    }
}

/// Caller-facing failure for `route`; carries no upstream detail.
pub fn upstream_failure(route: &str) -> Error {
    Error::upstream_failure(format!("failed to query {route} upstream"))
}

fn missing_parameter(name: &str) -> Error {
    Error::invalid_request(format!("missing required field: {name}")).with_details(json!({
        "field": name,
        "code": "missing_field",
    }))
}

/// Table-driven forwarder over an [`UpstreamTransport`].
pub struct Forwarder<T> {
    routes: Arc<RouteTable>,
    secrets: Arc<UpstreamSecrets>,
    transport: Arc<T>,
}

impl<T> Forwarder<T> {
    /// Create a forwarder over the given routes, secrets and transport.
    pub fn new(routes: Arc<RouteTable>, secrets: Arc<UpstreamSecrets>, transport: Arc<T>) -> Self {
        Self {
            routes,
            secrets,
            transport,
        }
    }
}

impl<T> Forwarder<T>
where
    T: UpstreamTransport,
{
    /// Relay one request for `route`.
    ///
    /// Missing parameters fail before any secret lookup or network call.
    pub async fn forward_route(
        &self,
        route: &RouteSpec,
        params: &QueryParams,
        secrets: &UpstreamSecrets,
    ) -> Result<ForwardResult, Error> {
        let name = route.name();
        let mut values: BTreeMap<&str, String> = BTreeMap::new();

        for param in route.required_params() {
            let value = params
                .get(param)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| missing_parameter(param))?;
            values.insert(
                param.as_str(),
                utf8_percent_encode(value, CALLER_VALUE_SET).to_string(),
            );
        }

        for secret in route.secret_refs() {
            let Some(value) = secrets.resolve(secret) else {
                error!(route = name, secret = %secret, "upstream secret is not configured");
                return Err(Error::internal(format!(
                    "secret {secret} is not configured for route {name}"
                )));
            };
            values.insert(secret.as_str(), value.to_owned());
        }

        // The rendered URL embeds secrets, so it is never logged.
        let url = route
            .url_template()
            .render(name, &values)
            .map_err(|err| {
                error!(route = name, error = %err, "upstream URL could not be rendered");
                upstream_failure(name)
            })
            .and_then(|rendered| {
                Url::parse(&rendered).map_err(|err| {
                    error!(route = name, error = %err, "rendered upstream URL is invalid");
                    upstream_failure(name)
                })
            })?;

        let response = self.transport.get(&url).await.map_err(|err| {
            error!(route = name, error = %err, "upstream request failed");
            upstream_failure(name)
        })?;

        let body: Box<RawValue> = serde_json::from_slice(&response.body).map_err(|err| {
            error!(
                route = name,
                status = response.status,
                error = %err,
                "upstream returned a non-JSON body"
            );
            upstream_failure(name)
        })?;

        if response.status >= 400 {
            warn!(
                route = name,
                upstream_status = response.status,
                "upstream answered with an error status; relaying its body"
            );
        } else {
            debug!(route = name, upstream_status = response.status, "relaying upstream response");
        }
        Ok(ForwardResult::new(RELAYED_STATUS, body))
    }
}

#[async_trait]
impl<T> ForwardingService for Forwarder<T>
where
    T: UpstreamTransport,
{
    async fn forward(&self, route: &str, params: &QueryParams) -> Result<ForwardResult, Error> {
        let Some(spec) = self.routes.get(route) else {
            debug!(route, "unknown route requested");
            return Err(Error::not_found(format!("unknown route: {route}")));
        };
        self.forward_route(spec, params, &self.secrets).await
    }
}

#[cfg(test)]
#[path = "forwarder_tests.rs"]
mod tests;
