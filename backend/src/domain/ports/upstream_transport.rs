//! Driven port for issuing one GET request to a third-party upstream.
//!
//! The transport only moves bytes. JSON validation and error normalisation
//! belong to the forwarder so every adapter fails the same way.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use super::define_port_error;

/// Raw upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code returned by the upstream.
    pub status: u16,
    /// Unparsed response body.
    pub body: Bytes,
}

define_port_error! {
    /// Errors surfaced while talking to an upstream.
    pub enum UpstreamTransportError {
        /// Network transport failed before a complete response arrived.
        Transport { message: String } =>
            "upstream transport failed: {message}",
        /// The upstream did not answer within the configured timeout.
        Timeout { message: String } =>
            "upstream timed out: {message}",
    }
}

/// Port for the single outbound call a forwarded request makes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Issue a GET to `url` and return the status and body.
    async fn get(&self, url: &Url) -> Result<UpstreamResponse, UpstreamTransportError>;
}
