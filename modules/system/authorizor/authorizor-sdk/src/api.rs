//! Public API trait for the authorizor.

use async_trait::async_trait;

use crate::models::AuthorizationDecision;

/// Public API trait for the authorizor.
///
/// Constructed once at start-up around the configured backend and shared by
/// the authenticator and the interceptor chain:
///
/// ```ignore
/// let authorizor: Arc<dyn AuthorizorClient> = Arc::new(RoleAuthorizor::new(backend));
///
/// let decision = authorizor.check_role(Some("alice@EXAMPLE.ORG"), Some("ADMIN")).await;
/// ```
///
/// Safe for concurrent calls.
#[async_trait]
pub trait AuthorizorClient: Send + Sync {
    /// Decide whether `uid` holds `role`.
    ///
    /// An absent or empty role always authorizes without consulting the
    /// backend. Backend failures deny; they never surface as errors.
    async fn check_role(&self, uid: Option<&str>, role: Option<&str>) -> AuthorizationDecision;
}
