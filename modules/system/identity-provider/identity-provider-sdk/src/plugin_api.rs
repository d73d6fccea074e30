//! Security provider seam for mechanism implementations.
//!
//! A mechanism plugin supplies an [`AcceptorCredential`]: the server's
//! long-lived credential, created once at start-up for a target name and a set
//! of mechanisms. The credential is a factory: every login derives its own
//! [`NegotiationContext`] from it, so concurrent requests never share
//! negotiation state.

use crate::error::MechanismError;
use crate::models::Mechanism;

/// Long-lived acceptor credential shared by all requests.
///
/// Immutable after construction and safe for concurrent use.
pub trait AcceptorCredential: Send + Sync {
    /// Derive a fresh negotiation context for one login attempt.
    ///
    /// # Errors
    ///
    /// Returns [`MechanismError::CredentialUnavailable`] if the credential can
    /// no longer accept contexts (e.g. an expired key).
    fn new_context(&self) -> Result<Box<dyn NegotiationContext>, MechanismError>;

    /// Service principal name the credential accepts for.
    fn target_name(&self) -> &str;

    /// Mechanisms the credential was created for.
    fn mechanisms(&self) -> &[Mechanism];
}

/// Per-login negotiation state.
///
/// Owned by exactly one login attempt and dropped when it finishes.
pub trait NegotiationContext: Send {
    /// Feed one input token into the context.
    ///
    /// Returns the output token the mechanism wants to send back to the
    /// client, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`MechanismError`] if the mechanism rejects the token.
    fn accept(&mut self, token: &[u8]) -> Result<Option<Vec<u8>>, MechanismError>;

    /// Whether the security context is fully established.
    fn is_established(&self) -> bool;

    /// Authenticated source name (`user@REALM`), once established.
    fn source_name(&self) -> Option<&str>;
}
