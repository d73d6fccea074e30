//! Configuration for the static authorizor plugin.

use std::path::PathBuf;

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthZPluginConfig {
    /// Authorization mode.
    pub mode: AuthZMode,
}

/// Authorization mode.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthZMode {
    /// Grant every role check.
    #[default]
    AllowAll,
    /// Grant membership listed in a role properties file.
    RoleFile { path: PathBuf },
}
