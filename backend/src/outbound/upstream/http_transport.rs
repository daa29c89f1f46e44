//! Reqwest-backed upstream transport adapter.
//!
//! This adapter owns transport details only: the client timeout, the outbound
//! identity and mapping reqwest failures onto the port error. Rendered URLs
//! embed secrets, so error text is stripped of the URL before it leaves here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::ports::{UpstreamResponse, UpstreamTransport, UpstreamTransportError};

const DEFAULT_USER_AGENT: &str = concat!("gateway/", env!("CARGO_PKG_VERSION"));

/// Upstream transport that performs one HTTP GET per call.
pub struct ReqwestUpstreamTransport {
    client: Client,
}

impl ReqwestUpstreamTransport {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamTransport for ReqwestUpstreamTransport {
    async fn get(&self, url: &Url) -> Result<UpstreamResponse, UpstreamTransportError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok(UpstreamResponse { status, body })
    }
}

fn map_transport_error(error: reqwest::Error) -> UpstreamTransportError {
    let error = error.without_url();
    if error.is_timeout() {
        UpstreamTransportError::timeout(error.to_string())
    } else {
        UpstreamTransportError::transport(error.to_string())
    }
}
