//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod forwarding_service;
mod login_service;
mod password_hash_verifier;
mod upstream_transport;

#[cfg(test)]
pub use forwarding_service::MockForwardingService;
pub use forwarding_service::ForwardingService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hash_verifier::MockPasswordHashVerifier;
pub use password_hash_verifier::{PasswordHashError, PasswordHashVerifier};
#[cfg(test)]
pub use upstream_transport::MockUpstreamTransport;
pub use upstream_transport::{UpstreamResponse, UpstreamTransport, UpstreamTransportError};
