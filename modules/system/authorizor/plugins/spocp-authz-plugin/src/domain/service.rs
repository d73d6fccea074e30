//! Service implementation for the SPOCP authorizor plugin.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use svcgate_security::normalize_uid;

use super::connection::{PolicyConnection, PolicyConnector, TcpPolicyConnector};
use super::error::PolicyClientError;
use super::sexpr::role_query;
use crate::config::SpocpPluginConfig;

/// SPOCP authorizor service.
///
/// Holds no connection between calls: each check connects, queries and logs
/// out, so concurrent checks never share a session.
pub struct Service {
    connector: Arc<dyn PolicyConnector>,
    realm: String,
    path: String,
    timeout: Duration,
}

impl Service {
    /// Create a service talking TCP to the configured server.
    #[must_use]
    pub fn from_config(cfg: &SpocpPluginConfig) -> Self {
        tracing::info!(
            address = %cfg.address(),
            realm = %cfg.realm,
            path = %cfg.path,
            timeout_ms = cfg.timeout_ms,
            "Configured SPOCP policy server"
        );
        Self::with_connector(Arc::new(TcpPolicyConnector::new(cfg.address())), cfg)
    }

    #[must_use]
    pub fn with_connector(connector: Arc<dyn PolicyConnector>, cfg: &SpocpPluginConfig) -> Self {
        Self {
            connector,
            realm: cfg.realm.clone(),
            path: cfg.path.clone(),
            timeout: cfg.timeout(),
        }
    }

    /// Ask the server whether `uid` holds `role`.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyClientError`] if the server could not be reached, did
    /// not answer in time, or answered with malformed data.
    pub async fn check_role(&self, uid: &str, role: &str) -> Result<bool, PolicyClientError> {
        let uid = normalize_uid(uid);
        let query = role_query(uid, &self.realm, role);
        tracing::debug!(query = %query, "querying policy server");

        let mut conn = self
            .bounded("connect", self.connector.connect())
            .await?;

        let result = self.ask(conn.as_mut(), &query).await;

        if let Err(e) = self.bounded("logout", conn.logout()).await {
            tracing::warn!(
                endpoint = %self.connector.endpoint(),
                error = %e,
                "policy server logout failed"
            );
        }

        let granted = result?;
        tracing::debug!(uid = %uid, role = %role, granted, "policy server answered");
        Ok(granted)
    }

    async fn ask(
        &self,
        conn: &mut dyn PolicyConnection,
        query: &super::sexpr::SExpr,
    ) -> Result<bool, PolicyClientError> {
        let response = self.bounded("query", conn.query(&self.path, query)).await?;
        if !response.is_success() {
            tracing::debug!(code = %response.code, text = %response.text, "query not granted");
        }
        Ok(response.is_success())
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, PolicyClientError>
    where
        F: Future<Output = Result<T, PolicyClientError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| PolicyClientError::Timeout {
                operation,
                timeout_ms: self.timeout.as_millis(),
            })?
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        self.connector.endpoint()
    }
}
