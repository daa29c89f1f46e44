//! Password-hash adapters.
//!
//! This module provides the scheme-aware implementation of the
//! `PasswordHashVerifier` port.

mod scheme_aware;

pub use scheme_aware::{SchemeAwarePasswordVerifier, timing_dummy_hash};
