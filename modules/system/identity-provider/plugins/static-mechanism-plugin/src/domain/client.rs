//! Negotiation context for the static mechanism plugin.
//!
//! Implements `NegotiationContext` as a single table lookup.

use std::collections::HashMap;
use std::sync::Arc;

use identity_provider_sdk::{MechanismError, NegotiationContext};

/// One login attempt against the static ticket table.
pub struct StaticContext {
    tickets: Arc<HashMap<Vec<u8>, String>>,
    source_name: Option<String>,
}

impl StaticContext {
    #[must_use]
    pub fn new(tickets: Arc<HashMap<Vec<u8>, String>>) -> Self {
        Self {
            tickets,
            source_name: None,
        }
    }
}

impl NegotiationContext for StaticContext {
    fn accept(&mut self, token: &[u8]) -> Result<Option<Vec<u8>>, MechanismError> {
        if self.source_name.is_some() {
            return Err(MechanismError::Internal(
                "context already established".to_owned(),
            ));
        }
        match self.tickets.get(token) {
            Some(name) => {
                self.source_name = Some(name.clone());
                Ok(None)
            }
            None => Err(MechanismError::Rejected("unknown ticket".to_owned())),
        }
    }

    fn is_established(&self) -> bool {
        self.source_name.is_some()
    }

    fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}
