//! Backend trait for authorizor implementations.

use async_trait::async_trait;

use crate::error::AuthorizorError;

/// Backend trait for role-check implementations.
///
/// Backends only see concrete requirements: the public-operation rule and
/// unauthenticated callers are handled before dispatch.
#[async_trait]
pub trait AuthorizorPluginClient: Send + Sync {
    /// Check whether `uid` holds `role`.
    ///
    /// # Arguments
    ///
    /// * `uid` - Realm-qualified principal name of the caller
    /// * `role` - Non-empty role required by the operation
    ///
    /// # Errors
    ///
    /// - `Backend` when the policy source could not be consulted
    /// - `Internal` for unexpected errors
    async fn check_role(&self, uid: &str, role: &str) -> Result<bool, AuthorizorError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
