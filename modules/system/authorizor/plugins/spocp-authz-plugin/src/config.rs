//! Configuration for the SPOCP authorizor plugin.

use std::time::Duration;

use serde::Deserialize;

/// Default SPOCP server port.
pub const DEFAULT_PORT: u16 = 4751;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpocpPluginConfig {
    /// Policy server host name or address.
    pub host: String,

    pub port: u16,

    /// Realm embedded in every query.
    pub realm: String,

    /// Rule path queried on the server.
    pub path: String,

    /// Limit for each of connect, query and logout.
    pub timeout_ms: u64,
}

impl Default for SpocpPluginConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            realm: String::new(),
            path: "/".to_owned(),
            timeout_ms: 5000,
        }
    }
}

impl SpocpPluginConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check mandatory values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("policy_server.host must not be empty".to_owned());
        }
        if self.realm.trim().is_empty() {
            return Err("policy_server.realm must not be empty".to_owned());
        }
        if self.timeout_ms == 0 {
            return Err("policy_server.timeout_ms must be greater than zero".to_owned());
        }
        Ok(())
    }
}
