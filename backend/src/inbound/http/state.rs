//! Shared HTTP adapter state.
//!
//! Handlers depend on domain ports only, so tests can swap in mocks and the
//! server can wire concrete services.

use std::sync::Arc;

use crate::domain::ports::{ForwardingService, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub forwarding: Arc<dyn ForwardingService>,
}

impl HttpState {
    /// Construct state from the two driving ports.
    pub fn new(login: Arc<dyn LoginService>, forwarding: Arc<dyn ForwardingService>) -> Self {
        Self { login, forwarding }
    }
}
