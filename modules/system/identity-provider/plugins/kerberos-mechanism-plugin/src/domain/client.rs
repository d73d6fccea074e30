//! Negotiation context backed by a GSS server context.

use identity_provider_sdk::{MechanismError, NegotiationContext};
use libgssapi::context::{SecurityContext as _, ServerCtx};

/// One login attempt, holding its own GSS server context.
pub struct KerberosContext {
    ctx: ServerCtx,
    source_name: Option<String>,
}

impl KerberosContext {
    #[must_use]
    pub fn new(ctx: ServerCtx) -> Self {
        Self {
            ctx,
            source_name: None,
        }
    }
}

impl NegotiationContext for KerberosContext {
    fn accept(&mut self, token: &[u8]) -> Result<Option<Vec<u8>>, MechanismError> {
        if self.source_name.is_some() {
            return Err(MechanismError::Internal(
                "context already established".to_owned(),
            ));
        }

        let reply = self
            .ctx
            .step(token)
            .map_err(|e| MechanismError::Rejected(e.to_string()))?;

        if self.ctx.is_complete() {
            let name = self.ctx.source_name().map_err(|e| {
                MechanismError::Internal(format!("cannot read the source name: {e}"))
            })?;
            self.source_name = Some(name.to_string());
        }

        Ok(reply.map(|buf| buf.to_vec()))
    }

    fn is_established(&self) -> bool {
        self.source_name.is_some()
    }

    fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}
