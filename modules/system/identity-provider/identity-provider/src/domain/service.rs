//! Negotiate login service.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use identity_provider_sdk::{AcceptorCredential, IdentityError};
use svcgate_security::Principal;

/// Upper bound on accept rounds within a single login.
pub const MAX_ACCEPT_ROUNDS: usize = 4;

/// Identity provider service.
///
/// Holds the shared acceptor credential; every call to [`Service::login`]
/// derives its own negotiation context from it.
pub struct Service {
    credential: Arc<dyn AcceptorCredential>,
}

impl Service {
    #[must_use]
    pub fn new(credential: Arc<dyn AcceptorCredential>) -> Self {
        Self { credential }
    }

    #[must_use]
    pub fn target_name(&self) -> &str {
        self.credential.target_name()
    }

    /// Establish a principal from a base64 mechanism token.
    ///
    /// Output tokens produced by the mechanism are fed back into the same
    /// context until it is established. A round without output while the
    /// context is still pending means the client has to send another leg,
    /// which is reported as [`IdentityError::ContinuationRequired`].
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] describing why no principal could be
    /// established.
    pub fn login(&self, token: &str) -> Result<Principal, IdentityError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityError::EmptyToken);
        }

        let input = STANDARD
            .decode(token)
            .map_err(|e| IdentityError::Decode(e.to_string()))?;
        tracing::debug!(token_len = input.len(), "accepting negotiation token");

        let mut ctx = self.credential.new_context()?;
        let mut next = input.clone();
        for round in 1..=MAX_ACCEPT_ROUNDS {
            let output = ctx.accept(&next)?;
            if ctx.is_established() {
                let name = ctx.source_name().ok_or(IdentityError::MissingSourceName)?;
                tracing::debug!(principal = %name, rounds = round, "security context established");
                return Ok(Principal::new(name, input));
            }
            match output {
                Some(out) if !out.is_empty() => next = out,
                _ => return Err(IdentityError::ContinuationRequired { rounds: round }),
            }
        }

        Err(IdentityError::ContinuationRequired {
            rounds: MAX_ACCEPT_ROUNDS,
        })
    }
}
