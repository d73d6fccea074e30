//! Domain service for the authorizor.

use std::sync::Arc;

use authorizor_sdk::{AuthorizationDecision, AuthorizorPluginClient, DenyReason};

/// Authorizor service.
pub struct Service {
    backend: Arc<dyn AuthorizorPluginClient>,
}

impl Service {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthorizorPluginClient>) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Evaluate `uid` against `role`.
    ///
    /// The public-role rule is applied before the backend is consulted.
    #[tracing::instrument(skip_all, fields(backend = self.backend.name()))]
    pub async fn check_role(&self, uid: Option<&str>, role: Option<&str>) -> AuthorizationDecision {
        let Some(role) = role.filter(|r| !r.is_empty()) else {
            return AuthorizationDecision::public(uid);
        };

        let Some(uid) = uid else {
            tracing::debug!(role = %role, "role required but caller is not authenticated");
            return AuthorizationDecision::denied(None, role, DenyReason::NotAuthenticated);
        };

        match self.backend.check_role(uid, role).await {
            Ok(true) => AuthorizationDecision::granted(uid, role),
            Ok(false) => AuthorizationDecision::denied(Some(uid), role, DenyReason::Policy),
            Err(e) => {
                tracing::error!(
                    backend = self.backend.name(),
                    role = %role,
                    uid = %uid,
                    error = %e,
                    "role check failed, denying"
                );
                AuthorizationDecision::denied(
                    Some(uid),
                    role,
                    DenyReason::BackendError(e.to_string()),
                )
            }
        }
    }
}
