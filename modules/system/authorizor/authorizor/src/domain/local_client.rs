//! Local (in-process) client for the authorizor.

use std::sync::Arc;

use async_trait::async_trait;
use authorizor_sdk::{AuthorizationDecision, AuthorizorClient, AuthorizorPluginClient};

use super::Service;

/// Role authorizor wrapping the service.
///
/// Constructed once at start-up around the configured backend.
pub struct RoleAuthorizor {
    svc: Arc<Service>,
}

impl RoleAuthorizor {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthorizorPluginClient>) -> Self {
        Self {
            svc: Arc::new(Service::new(backend)),
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.svc.backend_name()
    }
}

#[async_trait]
impl AuthorizorClient for RoleAuthorizor {
    async fn check_role(&self, uid: Option<&str>, role: Option<&str>) -> AuthorizationDecision {
        let decision = self.svc.check_role(uid, role).await;
        tracing::debug!(
            uid = uid.unwrap_or_default(),
            role = role.unwrap_or_default(),
            verdict = ?decision.verdict,
            "role check"
        );
        decision
    }
}
