//! Upstream HTTP transport adapters.

mod http_transport;

pub use http_transport::ReqwestUpstreamTransport;
