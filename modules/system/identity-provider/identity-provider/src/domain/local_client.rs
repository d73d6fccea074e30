//! In-process [`IdentityProvider`] implementation.

use std::sync::Arc;

use async_trait::async_trait;
use identity_provider_sdk::{AcceptorCredential, IdentityError, IdentityProvider};
use svcgate_security::Principal;

use super::error::{Severity, classify};
use super::service::Service;

/// Negotiate identity provider wrapping the domain service.
///
/// Constructed once at start-up from the acceptor credential and shared by
/// all requests.
pub struct NegotiateIdentityProvider {
    svc: Arc<Service>,
}

impl NegotiateIdentityProvider {
    #[must_use]
    pub fn new(credential: Arc<dyn AcceptorCredential>) -> Self {
        Self {
            svc: Arc::new(Service::new(credential)),
        }
    }
}

fn log_failure(e: &IdentityError) {
    match classify(e) {
        Severity::Operational => {
            tracing::error!(error = %e, "identity_provider login failed");
        }
        Severity::Routine => {
            tracing::debug!(error = %e, "identity_provider login failed");
        }
    }
}

#[async_trait]
impl IdentityProvider for NegotiateIdentityProvider {
    async fn login(&self, token: &str) -> Option<Principal> {
        match self.svc.login(token) {
            Ok(principal) => Some(principal),
            Err(e) => {
                log_failure(&e);
                None
            }
        }
    }

    fn validate(&self, _principal: &Principal) -> bool {
        false
    }
}
