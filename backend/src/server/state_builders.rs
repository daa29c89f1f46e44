//! Builders wiring settings into the domain services behind `HttpState`.

use std::sync::Arc;

use tracing::{error, info, warn};

use gateway::domain::{CredentialVerifier, Forwarder, RouteTable, UpstreamSecrets};
use gateway::inbound::http::state::HttpState;
use gateway::outbound::password::{SchemeAwarePasswordVerifier, timing_dummy_hash};
use gateway::outbound::upstream::ReqwestUpstreamTransport;
use gateway::settings::GatewaySettings;

fn build_credential_verifier(
    settings: &GatewaySettings,
) -> std::io::Result<CredentialVerifier<SchemeAwarePasswordVerifier>> {
    let directory = settings.user_directory();
    match &directory {
        Ok(users) => info!(users = users.len(), "user list loaded"),
        Err(err) => error!(error = %err, "user list unavailable; logins will fail"),
    }

    let verifier = CredentialVerifier::new(directory, Arc::new(SchemeAwarePasswordVerifier));
    if !settings.equalize_login_timing {
        return Ok(verifier);
    }
    let dummy = timing_dummy_hash().map_err(|err| {
        std::io::Error::other(format!("failed to prepare login timing hash: {err}"))
    })?;
    info!("login timing equalisation enabled");
    Ok(verifier.with_timing_dummy(dummy))
}

fn warn_unconfigured_secrets(routes: &RouteTable, secrets: &UpstreamSecrets) {
    for route in routes.iter() {
        for secret in route.secret_refs() {
            if secrets.resolve(secret).is_none() {
                warn!(
                    route = route.name(),
                    secret = %secret,
                    "upstream secret not configured; route will fail"
                );
            }
        }
    }
}

fn build_forwarder(
    settings: &GatewaySettings,
) -> std::io::Result<Forwarder<ReqwestUpstreamTransport>> {
    let routes = RouteTable::standard()
        .map_err(|err| std::io::Error::other(format!("invalid route table: {err}")))?;
    let secrets = settings.upstream_secrets();
    warn_unconfigured_secrets(&routes, &secrets);

    let transport = ReqwestUpstreamTransport::new(settings.upstream_timeout())
        .map_err(|err| std::io::Error::other(format!("failed to build HTTP client: {err}")))?;
    Ok(Forwarder::new(
        Arc::new(routes),
        Arc::new(secrets),
        Arc::new(transport),
    ))
}

/// Assemble the handler state from settings.
///
/// # Errors
///
/// Fails when the route table is invalid, the HTTP client cannot be built or
/// the timing-equalisation hash cannot be generated. A missing user list or
/// secret is not fatal; it surfaces per request.
pub(crate) fn build_http_state(settings: &GatewaySettings) -> std::io::Result<HttpState> {
    let verifier = build_credential_verifier(settings)?;
    let forwarder = build_forwarder(settings)?;
    Ok(HttpState::new(Arc::new(verifier), Arc::new(forwarder)))
}
