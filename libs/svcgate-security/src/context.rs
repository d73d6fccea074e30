use std::net::SocketAddr;

use crate::principal::Principal;

/// `CallerContext` carries what the gateway knows about the caller of one request.
///
/// Built by the Negotiate authenticator and passed through the request
/// lifecycle to the invocation layer. Deferred (introspection) requests carry
/// an anonymous context: no principal, so any role requirement downstream is
/// evaluated as unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    principal: Option<Principal>,
    remote_addr: Option<SocketAddr>,
    /// Request-scoped identifier used to correlate audit records.
    correlation_id: Option<String>,
}

impl CallerContext {
    /// Create a new `CallerContext` builder
    #[must_use]
    pub fn builder() -> CallerContextBuilder {
        CallerContextBuilder::default()
    }

    /// Create an anonymous `CallerContext` with no principal
    #[must_use]
    pub fn anonymous() -> Self {
        CallerContextBuilder::default().build()
    }

    /// The authenticated principal, if negotiation established one.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Realm-qualified name of the authenticated caller (the "remote user").
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.principal.as_ref().map(Principal::name)
    }

    #[must_use]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

#[derive(Default)]
pub struct CallerContextBuilder {
    principal: Option<Principal>,
    remote_addr: Option<SocketAddr>,
    correlation_id: Option<String>,
}

impl CallerContextBuilder {
    #[must_use]
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    #[must_use]
    pub fn remote_addr(mut self, remote_addr: Option<SocketAddr>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    #[must_use]
    pub fn correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    #[must_use]
    pub fn build(self) -> CallerContext {
        CallerContext {
            principal: self.principal,
            remote_addr: self.remote_addr,
            correlation_id: self.correlation_id,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_caller_context_builder_full() {
        let addr: SocketAddr = "192.0.2.10:52344".parse().unwrap();
        let ctx = CallerContext::builder()
            .principal(Principal::new("alice@EXAMPLE.ORG", b"tok".to_vec()))
            .remote_addr(Some(addr))
            .correlation_id(Some("req-1".to_owned()))
            .build();

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.uid(), Some("alice@EXAMPLE.ORG"));
        assert_eq!(ctx.remote_addr(), Some(addr));
        assert_eq!(ctx.correlation_id(), Some("req-1"));
    }

    #[test]
    fn test_caller_context_anonymous() {
        let ctx = CallerContext::anonymous();

        assert!(!ctx.is_authenticated());
        assert!(ctx.uid().is_none());
        assert!(ctx.principal().is_none());
        assert!(ctx.correlation_id().is_none());
    }

    #[test]
    fn test_caller_context_debug_hides_token() {
        let ctx = CallerContext::builder()
            .principal(Principal::new("alice@EXAMPLE.ORG", b"hidden-ticket".to_vec()))
            .build();

        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("alice@EXAMPLE.ORG"));
        assert!(!rendered.contains("hidden-ticket"));
    }
}
