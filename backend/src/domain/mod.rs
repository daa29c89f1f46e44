//! Domain primitives, services and ports.
//!
//! Purpose: hold the gateway's behaviour independent of actix-web, reqwest or
//! any hashing crate. Inbound adapters call the driving ports; outbound
//! adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: caller-facing error envelope.
//! - CredentialVerifier: login against the configured user list.
//! - Forwarder: table-driven relay to third-party upstreams.

pub mod auth;
pub mod credential_verifier;
pub mod error;
pub mod forwarder;
pub mod ports;
pub mod route_spec;
pub mod trace_id;
pub mod upstream_secrets;
pub mod user_directory;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::credential_verifier::{CredentialVerifier, VerificationOutcome};
pub use self::error::{Error, ErrorCode};
pub use self::forwarder::{ForwardResult, Forwarder, QueryParams};
pub use self::route_spec::{RouteSpec, RouteSpecError, RouteTable};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::upstream_secrets::UpstreamSecrets;
pub use self::user_directory::{UserDirectory, UserDirectoryError, UserRecord};
