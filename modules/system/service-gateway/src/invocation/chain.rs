//! The interceptor chain run around every operation call.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use authorizor_sdk::AuthorizorClient;
use futures::FutureExt as _;
use serde_json::Value;
use svcgate_audit::{AuditRecord, AuditSink, HIDDEN_VALUE, render_args, render_value};
use svcgate_security::CallerContext;
use tracing::Instrument as _;

use super::error::InvocationError;
use super::registry::ResolvedOperation;
use super::sanitize::{Sanitizer, TrimSanitizer};

/// Sanitize, authorize and audit around every operation call.
///
/// The stages run in that fixed order. A denied call never reaches the audit
/// stage, so it leaves no audit records behind.
pub struct InterceptorChain {
    sanitizer: Arc<dyn Sanitizer>,
    authorizor: Arc<dyn AuthorizorClient>,
    audit: Arc<dyn AuditSink>,
}

impl InterceptorChain {
    #[must_use]
    pub fn new(authorizor: Arc<dyn AuthorizorClient>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            sanitizer: Arc::new(TrimSanitizer),
            authorizor,
            audit,
        }
    }

    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Invoke `op` on behalf of `ctx`.
    ///
    /// A panic inside the operation is audited and then resumed.
    ///
    /// # Errors
    /// Returns [`InvocationError::Unauthorized`] if the caller lacks the
    /// required role and [`InvocationError::Fault`] if the operation fails.
    pub async fn invoke(
        &self,
        ctx: &CallerContext,
        op: &ResolvedOperation,
        args: Vec<Value>,
    ) -> Result<Value, InvocationError> {
        let args = self.sanitize(op, args);
        self.authorize(ctx, op).await?;
        self.audited(ctx, op, args).await
    }

    /// Run [`invoke`](Self::invoke) on its own task and wait for it.
    ///
    /// Dropping the returned future (request timeout, client disconnect) does
    /// not cancel the invocation: it runs to completion and closes its audit
    /// trail. A panic inside the operation is returned as
    /// [`InvocationError::Aborted`] once it has been audited.
    ///
    /// # Errors
    /// Same as [`invoke`](Self::invoke), plus [`InvocationError::Aborted`].
    pub async fn invoke_detached(
        self: Arc<Self>,
        ctx: CallerContext,
        op: Arc<ResolvedOperation>,
        args: Vec<Value>,
    ) -> Result<Value, InvocationError> {
        let task = tokio::spawn(
            async move { self.invoke(&ctx, &op, args).await }.in_current_span(),
        );
        match task.await {
            Ok(outcome) => outcome,
            Err(join) if join.is_panic() => {
                let payload = join.into_panic();
                Err(InvocationError::Aborted(format!(
                    "panic: {}",
                    panic_message(payload.as_ref())
                )))
            }
            Err(join) => Err(InvocationError::Aborted(join.to_string())),
        }
    }

    fn sanitize(&self, op: &ResolvedOperation, args: Vec<Value>) -> Vec<Value> {
        let washed = std::panic::catch_unwind(AssertUnwindSafe(|| self.sanitizer.sanitize(&args)));
        match washed {
            Ok(Ok(washed)) => washed,
            Ok(Err(e)) => {
                tracing::error!(
                    service = %op.service(),
                    operation = %op.name(),
                    error = %e,
                    "Failed to sanitize arguments, using them unchanged"
                );
                args
            }
            Err(payload) => {
                tracing::error!(
                    service = %op.service(),
                    operation = %op.name(),
                    error = %panic_message(payload.as_ref()),
                    "Sanitizer panicked, using arguments unchanged"
                );
                args
            }
        }
    }

    async fn authorize(
        &self,
        ctx: &CallerContext,
        op: &ResolvedOperation,
    ) -> Result<(), InvocationError> {
        let role = op.required_role();
        let uid = ctx.uid();
        let decision = self.authorizor.check_role(uid, role).await;

        let Some(reason) = decision.deny_reason() else {
            tracing::info!(
                uid = uid.unwrap_or("<anonymous>"),
                role = role.unwrap_or("<none>"),
                operation = %op.name(),
                "role check: OK"
            );
            return Ok(());
        };

        let role = role.unwrap_or_default().to_owned();
        tracing::info!(
            uid = uid.unwrap_or("<anonymous>"),
            authenticated = ctx.is_authenticated(),
            remote_addr = ?ctx.remote_addr(),
            role = %role,
            operation = %op.name(),
            reason = ?reason,
            "role check: DENIED"
        );
        Err(InvocationError::Unauthorized {
            role,
            reason: reason.clone(),
        })
    }

    async fn audited(
        &self,
        ctx: &CallerContext,
        op: &ResolvedOperation,
        args: Vec<Value>,
    ) -> Result<Value, InvocationError> {
        let started = AuditRecord::in_progress(
            ctx.correlation_id().map(str::to_owned),
            op.name(),
            render_args(&args),
            op.audit_details().to_vec(),
        );
        self.emit(started.clone()).await;

        let outcome = AssertUnwindSafe((op.handler())(args)).catch_unwind().await;
        match outcome {
            Ok(Ok(value)) => {
                let result = if op.hides_return_value() {
                    HIDDEN_VALUE.to_owned()
                } else {
                    render_value(&value)
                };
                self.emit(started.succeeded(result)).await;
                Ok(value)
            }
            Ok(Err(fault)) => {
                self.emit(started.failed(fault.to_string())).await;
                Err(fault.into())
            }
            Err(payload) => {
                let message = format!("panic: {}", panic_message(payload.as_ref()));
                self.emit(started.failed(message)).await;
                std::panic::resume_unwind(payload)
            }
        }
    }

    async fn emit(&self, record: AuditRecord) {
        let state = record.state;
        let operation = record.operation.clone();
        if let Err(e) = self.audit.record(record).await {
            tracing::warn!(operation = %operation, state = %state, error = %e, "audit sink failed");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic>"
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use authorizor::RoleAuthorizor;
    use authorizor_sdk::DenyReason;
    use serde_json::json;
    use static_authz_plugin::{RoleFile, Service as StaticAuthz};
    use svcgate_audit::{AuditError, AuditState, MemoryAuditSink};
    use svcgate_security::Principal;
    use tracing_test::traced_test;

    use std::time::Duration;

    use super::*;
    use crate::invocation::error::OperationFault;
    use crate::invocation::registry::{OperationRegistry, OperationSpec, ServiceDescriptor};
    use crate::invocation::sanitize::SanitizeError;

    fn registry() -> OperationRegistry {
        let mut registry = OperationRegistry::new();
        registry
            .register(
                ServiceDescriptor::new("Accounts")
                    .role("EXAMPLE.ORG")
                    .operation(
                        OperationSpec::new("whoami", |args: Vec<Value>| async move {
                            Ok(args.into_iter().next().unwrap_or(Value::Null))
                        })
                        .audit_details("reads account"),
                    )
                    .operation(
                        OperationSpec::new("password", |_args: Vec<Value>| async move {
                            Ok(json!("hunter2"))
                        })
                        .hide_return_value(),
                    )
                    .operation(
                        OperationSpec::new("purge", |_args: Vec<Value>| async move {
                            Ok(json!("purged"))
                        })
                        .role("ADMIN"),
                    )
                    .operation(OperationSpec::new("broken", |_args: Vec<Value>| async move {
                        Err(OperationFault::failed("directory unavailable"))
                    }))
                    .operation(OperationSpec::new("slow", |_args: Vec<Value>| async move {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(json!("done"))
                    }))
                    .operation(OperationSpec::new("explode", |_args: Vec<Value>| async move {
                        if true {
                            panic!("operation blew up");
                        }
                        Ok(Value::Null)
                    })),
            )
            .unwrap();
        registry
            .register(ServiceDescriptor::new("Status").operation(OperationSpec::new(
                "ping",
                |_args: Vec<Value>| async move { Ok(json!("pong")) },
            )))
            .unwrap();
        registry
    }

    fn role_file_authorizor() -> Arc<dyn AuthorizorClient> {
        let roles = RoleFile::parse("EXAMPLE.ORG = alice@EXAMPLE.ORG, bob@EXAMPLE.ORG").unwrap();
        Arc::new(RoleAuthorizor::new(Arc::new(StaticAuthz::with_role_file(roles))))
    }

    fn alice() -> CallerContext {
        CallerContext::builder()
            .principal(Principal::new("alice@EXAMPLE.ORG", b"ticket".to_vec()))
            .correlation_id(Some("req-42".to_owned()))
            .build()
    }

    struct Rejecting;

    impl Sanitizer for Rejecting {
        fn sanitize(&self, _args: &[Value]) -> Result<Vec<Value>, SanitizeError> {
            Err(SanitizeError("cannot wash".to_owned()))
        }
    }

    struct Panicking;

    impl Sanitizer for Panicking {
        fn sanitize(&self, _args: &[Value]) -> Result<Vec<Value>, SanitizeError> {
            panic!("sanitizer bug")
        }
    }

    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn record(&self, _record: AuditRecord) -> Result<(), AuditError> {
            Err(AuditError::Sink("disk full".to_owned()))
        }
    }

    #[tokio::test]
    async fn granted_call_is_audited_in_progress_then_success() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = InterceptorChain::new(role_file_authorizor(), sink.clone());
        let op = registry().resolve("Accounts", "whoami").unwrap();

        let out = chain.invoke(&alice(), &op, vec![json!("  alice  ")]).await.unwrap();
        assert_eq!(out, json!("alice"));

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, AuditState::InProgress);
        assert_eq!(records[0].operation, "whoami");
        assert_eq!(records[0].args, "[alice]");
        assert_eq!(records[0].result, None);
        assert_eq!(records[0].correlation_id.as_deref(), Some("req-42"));
        assert_eq!(records[0].method_details, vec!["reads account".to_owned()]);
        assert_eq!(records[1].state, AuditState::Success);
        assert_eq!(records[1].result.as_deref(), Some("alice"));
        assert_eq!(records[0].invocation_id, records[1].invocation_id);
    }

    #[tokio::test]
    async fn hidden_results_are_redacted_in_the_audit_trail_only() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = InterceptorChain::new(role_file_authorizor(), sink.clone());
        let op = registry().resolve("Accounts", "password").unwrap();

        let out = chain.invoke(&alice(), &op, Vec::new()).await.unwrap();
        assert_eq!(out, json!("hunter2"));

        let success = &sink.records()[1];
        assert_eq!(success.result.as_deref(), Some(HIDDEN_VALUE));
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_admin_role_denies_without_audit_records() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = InterceptorChain::new(role_file_authorizor(), sink.clone());
        let op = registry().resolve("Accounts", "purge").unwrap();

        let err = chain.invoke(&alice(), &op, Vec::new()).await.unwrap_err();

        let InvocationError::Unauthorized { role, reason } = &err else {
            panic!("expected an authorization denial");
        };
        assert_eq!(role, "ADMIN");
        assert_eq!(reason, &DenyReason::Policy);
        assert_eq!(err.to_string(), "You do not have the required role 'ADMIN'");
        assert!(sink.is_empty());
        assert!(logs_contain("role check: DENIED"));
        assert!(logs_contain("ADMIN"));
    }

    #[tokio::test]
    #[traced_test]
    async fn anonymous_caller_cannot_satisfy_a_role() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = InterceptorChain::new(role_file_authorizor(), sink.clone());
        let op = registry().resolve("Accounts", "whoami").unwrap();

        let err = chain
            .invoke(&CallerContext::anonymous(), &op, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Unauthorized {
                reason: DenyReason::NotAuthenticated,
                ..
            }
        ));
        assert!(sink.is_empty());
        assert!(logs_contain("authenticated=false"));
    }

    #[tokio::test]
    async fn public_operation_is_allowed_and_still_audited() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = InterceptorChain::new(role_file_authorizor(), sink.clone());
        let op = registry().resolve("Status", "ping").unwrap();

        let out = chain
            .invoke(&CallerContext::anonymous(), &op, Vec::new())
            .await
            .unwrap();
        assert_eq!(out, json!("pong"));
        assert_eq!(sink.count_in_state(AuditState::InProgress), 1);
        assert_eq!(sink.count_in_state(AuditState::Success), 1);
    }

    #[tokio::test]
    async fn operation_fault_is_recorded_once_and_returned() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = InterceptorChain::new(role_file_authorizor(), sink.clone());
        let op = registry().resolve("Accounts", "broken").unwrap();

        let err = chain.invoke(&alice(), &op, Vec::new()).await.unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Fault(OperationFault::Failed(ref m)) if m == "directory unavailable"
        ));

        assert_eq!(sink.count_in_state(AuditState::Exception), 1);
        assert_eq!(sink.count_in_state(AuditState::Success), 0);
        let records = sink.records_for("broken");
        assert_eq!(records[1].result.as_deref(), Some("directory unavailable"));
    }

    #[tokio::test]
    async fn panic_is_recorded_then_resumed() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = InterceptorChain::new(role_file_authorizor(), sink.clone());
        let op = registry().resolve("Accounts", "explode").unwrap();
        let ctx = alice();

        let caught = AssertUnwindSafe(chain.invoke(&ctx, &op, Vec::new()))
            .catch_unwind()
            .await;
        assert!(caught.is_err());

        let records = sink.records_for("explode");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].state, AuditState::Exception);
        assert_eq!(records[1].result.as_deref(), Some("panic: operation blew up"));
    }

    #[tokio::test]
    async fn dropped_detached_call_still_closes_its_audit_trail() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = Arc::new(InterceptorChain::new(role_file_authorizor(), sink.clone()));
        let op = registry().resolve("Accounts", "slow").unwrap();

        let call = Arc::clone(&chain).invoke_detached(alice(), op, Vec::new());
        let timed_out = tokio::time::timeout(Duration::from_millis(20), call).await;
        assert!(timed_out.is_err());
        assert_eq!(sink.count_in_state(AuditState::InProgress), 1);
        assert_eq!(sink.count_in_state(AuditState::Success), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let records = sink.records_for("slow");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].state, AuditState::Success);
        assert_eq!(records[1].result.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn detached_panic_is_audited_and_returned_as_aborted() {
        let sink = Arc::new(MemoryAuditSink::new());
        let chain = Arc::new(InterceptorChain::new(role_file_authorizor(), sink.clone()));
        let op = registry().resolve("Accounts", "explode").unwrap();

        let err = chain.invoke_detached(alice(), op, Vec::new()).await.unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Aborted(ref m) if m == "panic: operation blew up"
        ));
        let records = sink.records_for("explode");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].state, AuditState::Exception);
    }

    #[tokio::test]
    #[traced_test]
    async fn sanitizer_failures_do_not_prevent_invocation() {
        let registry = registry();
        let op = registry.resolve("Accounts", "whoami").unwrap();

        for sanitizer in [Arc::new(Rejecting) as Arc<dyn Sanitizer>, Arc::new(Panicking)] {
            let sink = Arc::new(MemoryAuditSink::new());
            let chain =
                InterceptorChain::new(role_file_authorizor(), sink.clone()).with_sanitizer(sanitizer);

            let out = chain.invoke(&alice(), &op, vec![json!(" raw ")]).await.unwrap();
            assert_eq!(out, json!(" raw "));
            assert_eq!(sink.count_in_state(AuditState::Success), 1);
        }
        assert!(logs_contain("Failed to sanitize arguments"));
        assert!(logs_contain("Sanitizer panicked"));
    }

    #[tokio::test]
    #[traced_test]
    async fn audit_sink_failure_is_logged_not_propagated() {
        let chain = InterceptorChain::new(role_file_authorizor(), Arc::new(FailingSink));
        let op = registry().resolve("Status", "ping").unwrap();

        let out = chain
            .invoke(&CallerContext::anonymous(), &op, Vec::new())
            .await
            .unwrap();
        assert_eq!(out, json!("pong"));
        assert!(logs_contain("audit sink failed"));
        assert!(logs_contain("disk full"));
    }
}
