//! Negotiate (RFC 4559) authentication.
//!
//! [`NegotiateAuthenticator`] decides, per request, between letting the
//! request through with an established principal, challenging the client,
//! rejecting it, or deferring it (introspection requests pass without an
//! identity). [`negotiate_middleware`] turns that decision into either a
//! [`CallerContext`] in the request extensions or a `401` problem response.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use authorizor_sdk::{AuthorizorClient, DenyReason};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use identity_provider_sdk::IdentityProvider;
use svcgate_security::{CallerContext, Principal};

use crate::challenge::ChallengeLedger;
use crate::config::{ConfigError, NegotiateConfig};
use crate::middleware::request_id::XRequestId;
use crate::problem::Problem;

pub const NEGOTIATE: &str = "Negotiate";

/// Paths served without authentication.
const PUBLIC_PATHS: &[&str] = &["/", "/status.html"];

/// Prefix of the introspection route, `GET /services/{service}`.
const INTROSPECTION_PREFIX: &str = "/services/";

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The client was challenged and retried without credentials.
    ChallengeIgnored,
    /// The `Authorization` header uses another scheme.
    UnsupportedScheme,
    /// The identity provider could not establish a principal.
    LoginFailed,
    /// A principal was established but does not hold its derived role.
    AuthorizationDenied(DenyReason),
}

impl RejectReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChallengeIgnored => "challenge_ignored",
            Self::UnsupportedScheme => "unsupported_scheme",
            Self::LoginFailed => "login_failed",
            Self::AuthorizationDenied(_) => "authorization_denied",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of authenticating one request.
#[derive(Debug, Clone)]
pub enum AuthenticationOutcome {
    Established(Principal),
    ChallengeRequired,
    Rejected(RejectReason),
    Deferred,
}

impl AuthenticationOutcome {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Established(_) => "established",
            Self::ChallengeRequired => "challenge_required",
            Self::Rejected(_) => "rejected",
            Self::Deferred => "deferred",
        }
    }
}

/// Negotiate authenticator.
///
/// Built once at start-up from injected collaborators and shared by every
/// request. Holds no per-request state besides the challenge ledger.
pub struct NegotiateAuthenticator {
    identity: Arc<dyn IdentityProvider>,
    authorizor: Arc<dyn AuthorizorClient>,
    ledger: ChallengeLedger,
    deferred_query: String,
    reject_challenge: HeaderValue,
}

impl NegotiateAuthenticator {
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the realm cannot be sent in a header.
    pub fn new(
        cfg: &NegotiateConfig,
        identity: Arc<dyn IdentityProvider>,
        authorizor: Arc<dyn AuthorizorClient>,
    ) -> Result<Self, ConfigError> {
        let reject_challenge = HeaderValue::from_str(&format!("{NEGOTIATE}, realm=\"{}\"", cfg.realm))
            .map_err(|e| ConfigError::Invalid {
                field: "negotiate.realm",
                reason: e.to_string(),
            })?;
        Ok(Self {
            identity,
            authorizor,
            ledger: ChallengeLedger::new(cfg.challenge_window()),
            deferred_query: cfg.deferred_query.clone(),
            reject_challenge,
        })
    }

    /// Whether the request is an introspection request passed through unauthenticated.
    ///
    /// Only a read of a service description carrying the marker query
    /// qualifies; operation calls are never deferred.
    #[must_use]
    pub fn is_deferred(&self, method: &Method, uri: &Uri) -> bool {
        let reads_description = (method == Method::GET || method == Method::HEAD)
            && uri
                .path()
                .strip_prefix(INTROSPECTION_PREFIX)
                .is_some_and(|service| !service.is_empty() && !service.contains('/'));
        reads_description
            && uri
                .query()
                .is_some_and(|q| q.eq_ignore_ascii_case(&self.deferred_query))
    }

    /// Run the Negotiate exchange for one request.
    pub async fn authenticate(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        remote_addr: Option<SocketAddr>,
    ) -> AuthenticationOutcome {
        if self.is_deferred(method, uri) {
            tracing::debug!(remote_addr = ?remote_addr, "introspection request, deferred");
            return AuthenticationOutcome::Deferred;
        }

        let Some(header) = headers.get(AUTHORIZATION) else {
            return self.challenge_or_reject(remote_addr);
        };
        if let Some(addr) = remote_addr {
            self.ledger.clear(addr);
        }

        let Some(token) = header.to_str().ok().and_then(negotiate_token) else {
            return rejected(RejectReason::UnsupportedScheme, remote_addr, None);
        };

        let Some(principal) = self.identity.login(token).await else {
            return rejected(RejectReason::LoginFailed, remote_addr, None);
        };

        let decision = self
            .authorizor
            .check_role(Some(principal.name()), Some(principal.role()))
            .await;
        if let Some(reason) = decision.deny_reason() {
            return rejected(
                RejectReason::AuthorizationDenied(reason.clone()),
                remote_addr,
                Some(&principal),
            );
        }

        tracing::info!(
            outcome = "established",
            remote_addr = ?remote_addr,
            principal = %principal.name(),
            role = %principal.role(),
            "Negotiate: OK"
        );
        AuthenticationOutcome::Established(principal)
    }

    fn challenge_or_reject(&self, remote_addr: Option<SocketAddr>) -> AuthenticationOutcome {
        match remote_addr {
            Some(addr) if self.ledger.was_challenged(addr) => {
                rejected(RejectReason::ChallengeIgnored, remote_addr, None)
            }
            Some(addr) => {
                self.ledger.record(addr);
                tracing::debug!(remote_addr = %addr, "no credentials, sending challenge");
                AuthenticationOutcome::ChallengeRequired
            }
            None => {
                tracing::debug!("no credentials and no remote address, sending challenge");
                AuthenticationOutcome::ChallengeRequired
            }
        }
    }

    /// Response for an outcome that stops the request.
    ///
    /// Returns `None` for outcomes that let the request through.
    #[must_use]
    pub fn refusal(&self, outcome: &AuthenticationOutcome) -> Option<Response> {
        let problem = match outcome {
            AuthenticationOutcome::Established(_) | AuthenticationOutcome::Deferred => return None,
            AuthenticationOutcome::ChallengeRequired => {
                unauthorized("Negotiate authentication required")
                    .with_challenge(HeaderValue::from_static(NEGOTIATE))
            }
            AuthenticationOutcome::Rejected(RejectReason::ChallengeIgnored) => {
                unauthorized("No credentials supplied after challenge")
            }
            AuthenticationOutcome::Rejected(_) => {
                unauthorized("Authentication failed").with_challenge(self.reject_challenge.clone())
            }
        };
        Some(problem.into_response())
    }
}

fn unauthorized(detail: &str) -> Problem {
    Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail)
}

fn rejected(
    reason: RejectReason,
    remote_addr: Option<SocketAddr>,
    principal: Option<&Principal>,
) -> AuthenticationOutcome {
    let principal_name = principal.map_or("UNKNOWN", Principal::name);
    match &reason {
        RejectReason::AuthorizationDenied(deny) => tracing::info!(
            outcome = "rejected",
            reason = %reason,
            deny = ?deny,
            remote_addr = ?remote_addr,
            principal = %principal_name,
            "Negotiate: authorization denied"
        ),
        _ => tracing::info!(
            outcome = "rejected",
            reason = %reason,
            remote_addr = ?remote_addr,
            principal = %principal_name,
            "Negotiate: rejected"
        ),
    }
    AuthenticationOutcome::Rejected(reason)
}

/// Token of a `Negotiate <token>` header value; `None` for other schemes.
fn negotiate_token(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let (scheme, rest) = value.split_at_checked(NEGOTIATE.len())?;
    if !scheme.eq_ignore_ascii_case(NEGOTIATE) {
        return None;
    }
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn is_public_route(method: &Method, path: &str) -> bool {
    (method == Method::GET || method == Method::HEAD)
        && PUBLIC_PATHS.contains(&path)
}

/// Authentication middleware.
///
/// For each request:
/// 1. Public routes (status page) pass with an anonymous [`CallerContext`]
/// 2. Otherwise runs [`NegotiateAuthenticator::authenticate`]
/// 3. Established and deferred requests continue with a [`CallerContext`];
///    everything else is answered with `401`
pub async fn negotiate_middleware(
    State(auth): State<Arc<NegotiateAuthenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let correlation_id = req
        .extensions()
        .get::<XRequestId>()
        .map(|XRequestId(id)| id.clone());
    let ctx = CallerContext::builder()
        .remote_addr(remote_addr)
        .correlation_id(correlation_id);

    if is_public_route(req.method(), req.uri().path()) {
        req.extensions_mut().insert(ctx.build());
        return next.run(req).await;
    }

    tracing::debug!(remote_addr = ?remote_addr, "Intercepting request");
    let outcome = auth
        .authenticate(req.method(), req.uri(), req.headers(), remote_addr)
        .await;
    tracing::Span::current().record("auth_outcome", outcome.name());
    if let Some(refusal) = auth.refusal(&outcome) {
        return refusal;
    }

    let ctx = match outcome {
        AuthenticationOutcome::Established(principal) => ctx.principal(principal).build(),
        _ => ctx.build(),
    };
    req.extensions_mut().insert(ctx);
    next.run(req).await
}
