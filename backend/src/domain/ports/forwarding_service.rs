//! Driving port for relaying a whitelisted route to its upstream.

use async_trait::async_trait;

use crate::domain::{Error, ForwardResult, QueryParams};

/// Domain use-case port for proxied routes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForwardingService: Send + Sync {
    /// Forward the named route with the caller's query parameters.
    async fn forward(&self, route: &str, params: &QueryParams) -> Result<ForwardResult, Error>;
}
