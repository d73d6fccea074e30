//! Service implementation for the static authorizor plugin.

use crate::config::{AuthZMode, StaticAuthZPluginConfig};

use super::role_file::{RoleFile, RoleFileError};

enum Policy {
    AllowAll,
    RoleFile(RoleFile),
}

/// Static authorizor service.
///
/// - `allow_all`: every check succeeds
/// - `role_file`: membership from a role file loaded at construction
pub struct Service {
    policy: Policy,
}

impl Service {
    /// Build the service, loading the role file if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`RoleFileError`] if the role file cannot be read or parsed.
    pub fn from_config(cfg: &StaticAuthZPluginConfig) -> Result<Self, RoleFileError> {
        match &cfg.mode {
            AuthZMode::AllowAll => {
                tracing::warn!(
                    "Static authorizor is running in `allow_all` mode: every role check succeeds"
                );
                Ok(Self::allow_all())
            }
            AuthZMode::RoleFile { path } => {
                let roles = RoleFile::load(path)?;
                tracing::info!(
                    path = %path.display(),
                    role_count = roles.role_count(),
                    "Loaded role file"
                );
                Ok(Self::with_role_file(roles))
            }
        }
    }

    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            policy: Policy::AllowAll,
        }
    }

    #[must_use]
    pub fn with_role_file(roles: RoleFile) -> Self {
        Self {
            policy: Policy::RoleFile(roles),
        }
    }

    #[must_use]
    pub fn mode_name(&self) -> &'static str {
        match self.policy {
            Policy::AllowAll => "allow_all",
            Policy::RoleFile(_) => "role_file",
        }
    }

    /// Check `uid` against `role`.
    #[must_use]
    pub fn check_role(&self, uid: &str, role: &str) -> bool {
        match &self.policy {
            Policy::AllowAll => true,
            Policy::RoleFile(roles) => roles.is_member(role, uid),
        }
    }
}
