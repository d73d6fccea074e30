//! Gateway assembly: builds the router and serves it.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use authorizor_sdk::AuthorizorClient;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use identity_provider_sdk::IdentityProvider;
use svcgate_audit::{AuditSink, NoopAuditSink};
use tokio::net::TcpListener;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use crate::auth::{self, NegotiateAuthenticator};
use crate::config::{ConfigError, GatewayConfig};
use crate::invocation::{InterceptorChain, OperationRegistry, Sanitizer};
use crate::middleware::request_id;
use crate::routes::{self, InvocationState};
use crate::status::{self, StatusInfo};

/// Collaborators the gateway is constructed with.
#[derive(Clone)]
pub struct GatewayDeps {
    pub identity: Arc<dyn IdentityProvider>,
    pub authorizor: Arc<dyn AuthorizorClient>,
    pub audit: Arc<dyn AuditSink>,
    /// Replaces the default whitespace-trimming sanitizer.
    pub sanitizer: Option<Arc<dyn Sanitizer>>,
}

/// The service gateway: owns the HTTP server and everything in front of the
/// registered operations.
pub struct ServiceGateway {
    config: GatewayConfig,
    authenticator: Arc<NegotiateAuthenticator>,
    invocation: InvocationState,
    status: Arc<StatusInfo>,
}

impl ServiceGateway {
    /// Validate the configuration and assemble the gateway.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(
        config: GatewayConfig,
        deps: GatewayDeps,
        registry: OperationRegistry,
        status: StatusInfo,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let authenticator = NegotiateAuthenticator::new(
            &config.negotiate,
            deps.identity,
            Arc::clone(&deps.authorizor),
        )?;

        let audit: Arc<dyn AuditSink> = if config.audit.enabled {
            deps.audit
        } else {
            tracing::warn!("Invocation auditing is DISABLED");
            Arc::new(NoopAuditSink)
        };
        let mut chain = InterceptorChain::new(deps.authorizor, audit);
        if let Some(sanitizer) = deps.sanitizer {
            chain = chain.with_sanitizer(sanitizer);
        }

        tracing::info!(
            services = registry.service_count(),
            operations = registry.operation_count(),
            realm = %config.negotiate.realm,
            "Service gateway assembled"
        );

        Ok(Self {
            config,
            authenticator: Arc::new(authenticator),
            invocation: InvocationState {
                registry: Arc::new(registry),
                chain: Arc::new(chain),
            },
            status: Arc::new(status),
        })
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the router with the full middleware stack.
    #[must_use]
    pub fn build_router(&self) -> Router {
        let services = Router::new()
            .route("/services/{service}", get(routes::describe_service))
            .route("/services/{service}/{operation}", post(routes::invoke_operation))
            .with_state(self.invocation.clone());
        let status_page = Router::new()
            .route("/", get(status::status_page))
            .route("/status.html", get(status::status_page))
            .with_state(Arc::clone(&self.status));
        let mut router = services.merge(status_page);

        // `Router::layer` wraps everything added so far: the last layer added
        // runs first. Request order (outermost -> innermost):
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
        // -> Timeout -> Negotiate -> Router

        // 5) Negotiate authentication
        router = router.layer(from_fn_with_state(
            Arc::clone(&self.authenticator),
            auth::negotiate_middleware,
        ));

        // 4) Timeout
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            self.config.server.request_timeout(),
        ));

        // 3) Record request_id into span + extensions (inner to Trace)
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));

        // 2) Trace
        router = router.layer({
            use tower_http::trace::TraceLayer;
            use tracing::field::Empty;

            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        version = ?req.version(),
                        module = "service_gateway",
                        request_id = Empty,
                        auth_outcome = Empty,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                )
        });

        // 1) Request ID handling
        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind the configured address.
    ///
    /// # Errors
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let addr = self.config.server.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);
        Ok(listener)
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// # Errors
    /// Returns an error if the server fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await
        .map_err(|e| anyhow::anyhow!(e))
    }
}
