//! Client implementation for the static authorizor plugin.

use async_trait::async_trait;
use authorizor_sdk::{AuthorizorError, AuthorizorPluginClient};

use super::service::Service;

#[async_trait]
impl AuthorizorPluginClient for Service {
    async fn check_role(&self, uid: &str, role: &str) -> Result<bool, AuthorizorError> {
        Ok(self.check_role(uid, role))
    }

    fn name(&self) -> &'static str {
        self.mode_name()
    }
}
