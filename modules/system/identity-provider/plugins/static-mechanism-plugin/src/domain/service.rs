//! Acceptor credential for the static mechanism plugin.

use std::collections::HashMap;
use std::sync::Arc;

use identity_provider_sdk::{AcceptorCredential, Mechanism, MechanismError, NegotiationContext};

use super::client::StaticContext;
use crate::config::StaticMechanismPluginConfig;

/// Static acceptor credential.
///
/// Built once at start-up; the ticket table is shared read-only with every
/// context it derives.
pub struct StaticCredential {
    target_name: String,
    mechanisms: Vec<Mechanism>,
    tickets: Arc<HashMap<Vec<u8>, String>>,
}

impl StaticCredential {
    /// Create the credential for a target name and mechanism set.
    ///
    /// # Errors
    ///
    /// Returns [`MechanismError::CredentialUnavailable`] if the target name is
    /// empty or no mechanism is requested.
    pub fn new(
        target_name: impl Into<String>,
        mechanisms: Vec<Mechanism>,
        cfg: &StaticMechanismPluginConfig,
    ) -> Result<Self, MechanismError> {
        let target_name = target_name.into();
        if target_name.trim().is_empty() {
            return Err(MechanismError::CredentialUnavailable(
                "target name is empty".to_owned(),
            ));
        }
        if mechanisms.is_empty() {
            return Err(MechanismError::CredentialUnavailable(
                "no mechanisms requested".to_owned(),
            ));
        }

        let tickets: HashMap<Vec<u8>, String> = cfg
            .static_tokens
            .iter()
            .map(|m| (m.token.as_bytes().to_vec(), m.principal.clone()))
            .collect();

        tracing::info!(
            target_name = %target_name,
            mechanisms = ?mechanisms,
            ticket_count = tickets.len(),
            "Static acceptor credential created"
        );

        Ok(Self {
            target_name,
            mechanisms,
            tickets: Arc::new(tickets),
        })
    }
}

impl AcceptorCredential for StaticCredential {
    fn new_context(&self) -> Result<Box<dyn NegotiationContext>, MechanismError> {
        Ok(Box::new(StaticContext::new(Arc::clone(&self.tickets))))
    }

    fn target_name(&self) -> &str {
        &self.target_name
    }

    fn mechanisms(&self) -> &[Mechanism] {
        &self.mechanisms
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::TokenMapping;

    fn config() -> StaticMechanismPluginConfig {
        StaticMechanismPluginConfig {
            static_tokens: vec![TokenMapping {
                token: "alice-ticket".to_owned(),
                principal: "alice@EXAMPLE.ORG".to_owned(),
            }],
        }
    }

    #[test]
    fn credential_requires_target_and_mechanisms() {
        assert!(StaticCredential::new("", Mechanism::all(), &config()).is_err());
        assert!(StaticCredential::new("HTTP@svc", Vec::new(), &config()).is_err());

        let cred = StaticCredential::new("HTTP@svc", vec![Mechanism::Spnego], &config()).unwrap();
        assert_eq!(cred.target_name(), "HTTP@svc");
        assert_eq!(cred.mechanisms(), &[Mechanism::Spnego]);
    }

    #[test]
    fn contexts_are_independent() {
        let cred = StaticCredential::new("HTTP@svc", Mechanism::all(), &config()).unwrap();

        let mut first = cred.new_context().unwrap();
        let second = cred.new_context().unwrap();

        first.accept(b"alice-ticket").unwrap();
        assert!(first.is_established());
        assert!(!second.is_established());
        assert!(second.source_name().is_none());
    }
}
