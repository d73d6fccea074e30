//! Application configuration: the gateway settings plus backend selection.
//!
//! Loaded from a YAML file, then overridden by `SVCGATE_`-prefixed environment
//! variables (`__` separates nesting levels, e.g.
//! `SVCGATE_SERVER__BIND_ADDR=127.0.0.1:9090`).

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use figment::Figment;
use figment::providers::{Env, Format as _, Yaml};
use serde::Deserialize;
use service_gateway::{AuditConfig, GatewayConfig, NegotiateConfig, ServerConfig};
use spocp_authz_plugin::SpocpPluginConfig;
use static_authz_plugin::{AuthZMode, StaticAuthZPluginConfig};
use static_mechanism_plugin::{StaticMechanismPluginConfig, TokenMapping};

pub const ENV_PREFIX: &str = "SVCGATE_";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub negotiate: NegotiateConfig,
    #[serde(default)]
    pub mechanism: MechanismConfig,
    #[serde(default)]
    pub authorizor: AuthorizorConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Which security provider accepts Negotiate tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismProvider {
    /// Configured ticket table, for development and tests.
    #[default]
    Static,
    /// System GSS-API library with a keytab. Needs the `kerberos` feature.
    Kerberos,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MechanismConfig {
    #[serde(default)]
    pub provider: MechanismProvider,
    #[serde(default)]
    pub static_tokens: Vec<TokenMapping>,
    /// Keytab the `kerberos` provider expects `KRB5_KTNAME` to name.
    pub keytab: Option<PathBuf>,
}

impl MechanismConfig {
    #[must_use]
    pub fn static_plugin(&self) -> StaticMechanismPluginConfig {
        StaticMechanismPluginConfig {
            static_tokens: self.static_tokens.clone(),
        }
    }

    #[cfg(feature = "kerberos")]
    #[must_use]
    pub fn kerberos_plugin(&self) -> kerberos_mechanism_plugin::KerberosMechanismPluginConfig {
        kerberos_mechanism_plugin::KerberosMechanismPluginConfig {
            keytab: self.keytab.clone(),
        }
    }

    /// # Errors
    /// Returns an error if the provider is not compiled in.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider == MechanismProvider::Kerberos && !cfg!(feature = "kerberos") {
            bail!("mechanism.provider kerberos needs a server built with the `kerberos` feature");
        }
        Ok(())
    }
}

/// Which authorizor backend answers role checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    AllowAll,
    RoleFile,
    PolicyServer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleFileConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizorConfig {
    #[serde(default)]
    pub backend: Backend,
    pub role_file: Option<RoleFileConfig>,
    pub policy_server: Option<SpocpPluginConfig>,
}

/// The selected backend with its settings.
#[derive(Debug, Clone)]
pub enum BackendSelection {
    Static(StaticAuthZPluginConfig),
    PolicyServer(SpocpPluginConfig),
}

impl AuthorizorConfig {
    /// Resolve the backend selection, checking that its section is present.
    ///
    /// # Errors
    /// Returns an error if the selected backend has no or an invalid section.
    pub fn selection(&self) -> anyhow::Result<BackendSelection> {
        match self.backend {
            Backend::AllowAll => Ok(BackendSelection::Static(StaticAuthZPluginConfig {
                mode: AuthZMode::AllowAll,
            })),
            Backend::RoleFile => {
                let Some(section) = &self.role_file else {
                    bail!("authorizor.role_file is required for the role_file backend");
                };
                Ok(BackendSelection::Static(StaticAuthZPluginConfig {
                    mode: AuthZMode::RoleFile {
                        path: section.path.clone(),
                    },
                }))
            }
            Backend::PolicyServer => {
                let Some(section) = &self.policy_server else {
                    bail!("authorizor.policy_server is required for the policy_server backend");
                };
                section.validate().map_err(|reason| anyhow::anyhow!(reason))?;
                Ok(BackendSelection::PolicyServer(section.clone()))
            }
        }
    }
}

impl AppConfig {
    /// Load from `path` (if given) and the environment, then validate.
    ///
    /// # Errors
    /// Returns an error if the file is missing, a value cannot be
    /// deserialised, or validation fails.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.exists() {
                bail!("configuration file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        Self::from_figment(&figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract and validate from an already assembled figment.
    ///
    /// # Errors
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        let cfg: Self = figment.extract().context("invalid configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.gateway().validate().context("invalid gateway configuration")?;
        self.mechanism.validate()?;
        self.authorizor.selection()?;
        Ok(())
    }

    #[must_use]
    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            server: self.server.clone(),
            negotiate: self.negotiate.clone(),
            audit: self.audit.clone(),
        }
    }
}
