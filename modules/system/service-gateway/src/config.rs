//! Gateway settings: listener, Negotiate handling and audit.

use std::net::SocketAddr;
use std::time::Duration;

use identity_provider_sdk::Mechanism;
use serde::{Deserialize, Serialize};

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_mechanisms() -> Vec<Mechanism> {
    Mechanism::all()
}

fn default_deferred_query() -> String {
    "wsdl".to_owned()
}

fn default_challenge_window_secs() -> u64 {
    30
}

fn default_audit_enabled() -> bool {
    true
}

/// Configuration errors. All of them are fatal at start-up.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("server.bind_addr '{value}' is not a socket address: {reason}")]
    InvalidBindAddr { value: String, reason: String },

    #[error("{0} must not be empty")]
    Missing(&'static str),

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Service gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub negotiate: NegotiateConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Requests running longer than this get `504 Gateway Timeout`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NegotiateConfig {
    /// Realm advertised in the reject challenge.
    pub realm: String,
    /// Service principal the acceptor credential is created for.
    pub target_name: String,
    #[serde(default = "default_mechanisms")]
    pub mechanisms: Vec<Mechanism>,
    /// Query string of introspection requests (`?wsdl`), compared case-insensitively.
    #[serde(default = "default_deferred_query")]
    pub deferred_query: String,
    /// How long a sent challenge is remembered per connection.
    #[serde(default = "default_challenge_window_secs")]
    pub challenge_window_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuditConfig {
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
        }
    }
}

impl ServerConfig {
    /// Parse the bind address.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBindAddr`] if the value is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                reason: e.to_string(),
            })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl NegotiateConfig {
    #[must_use]
    pub fn challenge_window(&self) -> Duration {
        Duration::from_secs(self.challenge_window_secs)
    }
}

impl GatewayConfig {
    /// Check the mandatory values.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "server.request_timeout_secs",
            });
        }
        if self.negotiate.realm.trim().is_empty() {
            return Err(ConfigError::Missing("negotiate.realm"));
        }
        if self.negotiate.target_name.trim().is_empty() {
            return Err(ConfigError::Missing("negotiate.target_name"));
        }
        if self.negotiate.mechanisms.is_empty() {
            return Err(ConfigError::Missing("negotiate.mechanisms"));
        }
        if self.negotiate.deferred_query.trim().is_empty() {
            return Err(ConfigError::Missing("negotiate.deferred_query"));
        }
        Ok(())
    }
}
