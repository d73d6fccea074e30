//! Client implementation for the SPOCP authorizor plugin.

use async_trait::async_trait;
use authorizor_sdk::{AuthorizorError, AuthorizorPluginClient};

use super::service::Service;

#[async_trait]
impl AuthorizorPluginClient for Service {
    async fn check_role(&self, uid: &str, role: &str) -> Result<bool, AuthorizorError> {
        self.check_role(uid, role).await.map_err(|e| {
            tracing::error!(
                endpoint = %self.endpoint(),
                role = %role,
                uid = %uid,
                error = %e,
                "Could not check SPOCP role"
            );
            AuthorizorError::Backend(e.to_string())
        })
    }

    fn name(&self) -> &'static str {
        "policy_server"
    }
}
