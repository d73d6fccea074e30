//! Public API trait for the identity provider.
//!
//! This trait defines the interface the Negotiate authenticator uses to turn
//! a client token into a principal.

use async_trait::async_trait;
use svcgate_security::Principal;

/// Public API trait for the identity provider.
///
/// Constructed once at start-up and shared by every request:
///
/// ```ignore
/// let provider: Arc<dyn IdentityProvider> = Arc::new(NegotiateIdentityProvider::new(credential));
///
/// let principal = provider.login("YIIC...").await;
/// ```
///
/// # Security
///
/// Implementations must never log the token itself; at most its length.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Establish a principal from a base64-encoded mechanism token.
    ///
    /// Returns `None` on any failure (malformed token, mechanism rejection,
    /// expired credential, second leg required). Never fails loudly: the
    /// caller maps `None` to a rejection.
    async fn login(&self, token: &str) -> Option<Principal>;

    /// Re-validate a previously established principal.
    ///
    /// Always `false`: established identities are not cached, every request
    /// negotiates again.
    fn validate(&self, principal: &Principal) -> bool;
}
