//! Operation dispatch routes.
//!
//! - `POST /services/{service}/{operation}` with `{"args": [...]}` invokes an
//!   operation through the interceptor chain
//! - `GET /services/{service}` describes a service's operations

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use svcgate_security::CallerContext;

use crate::auth::NEGOTIATE;
use crate::invocation::{InterceptorChain, InvocationError, OperationFault, OperationRegistry};
use crate::problem::Problem;

/// Shared state of the dispatch routes.
#[derive(Clone)]
pub struct InvocationState {
    pub registry: Arc<OperationRegistry>,
    pub chain: Arc<InterceptorChain>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvokeRequest {
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub result: Value,
}

impl IntoResponse for InvocationError {
    fn into_response(self) -> Response {
        let problem = match &self {
            Self::Unauthorized { .. } => {
                Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", self.to_string())
                    .with_challenge(HeaderValue::from_static(NEGOTIATE))
            }
            Self::NotFound { .. } => Problem::new(StatusCode::NOT_FOUND, "Not Found", self.to_string()),
            Self::Fault(OperationFault::InvalidArguments(_)) => {
                Problem::new(StatusCode::BAD_REQUEST, "Bad Request", self.to_string())
            }
            Self::Fault(OperationFault::Failed(_)) | Self::Aborted(_) => Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Operation Failed",
                self.to_string(),
            ),
        };
        problem.into_response()
    }
}

fn parse_body(body: &[u8]) -> Result<Vec<Value>, Problem> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice::<InvokeRequest>(body)
        .map(|req| req.args)
        .map_err(|e| Problem::new(StatusCode::BAD_REQUEST, "Bad Request", format!("invalid request body: {e}")))
}

pub async fn invoke_operation(
    State(state): State<InvocationState>,
    Path((service, operation)): Path<(String, String)>,
    ctx: Option<Extension<CallerContext>>,
    body: Bytes,
) -> Response {
    let Some(op) = state.registry.resolve(&service, &operation) else {
        return InvocationError::NotFound { service, operation }.into_response();
    };
    let args = match parse_body(&body) {
        Ok(args) => args,
        Err(problem) => return problem.into_response(),
    };
    let ctx = ctx.map(|Extension(ctx)| ctx).unwrap_or_default();

    let chain = Arc::clone(&state.chain);
    match chain.invoke_detached(ctx, op, args).await {
        Ok(result) => Json(InvokeResponse { result }).into_response(),
        Err(err) => {
            match &err {
                InvocationError::Fault(fault) => tracing::warn!(
                    service = %service,
                    operation = %operation,
                    error = %fault,
                    "operation failed"
                ),
                InvocationError::Aborted(reason) => tracing::error!(
                    service = %service,
                    operation = %operation,
                    error = %reason,
                    "operation aborted"
                ),
                InvocationError::Unauthorized { .. } | InvocationError::NotFound { .. } => {}
            }
            err.into_response()
        }
    }
}

pub async fn describe_service(
    State(state): State<InvocationState>,
    Path(service): Path<String>,
) -> Response {
    match state.registry.describe(&service) {
        Some(description) => Json(description).into_response(),
        None => Problem::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            format!("no service '{service}'"),
        )
        .into_response(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_body_means_no_arguments() {
        assert!(parse_body(b"").unwrap().is_empty());
        assert!(parse_body(b" \n").unwrap().is_empty());
        assert!(parse_body(b"{}").unwrap().is_empty());
    }

    #[test]
    fn args_are_taken_from_the_body() {
        let args = parse_body(br#"{"args": ["alice", 3]}"#).unwrap();
        assert_eq!(args, vec![json!("alice"), json!(3)]);
    }

    #[test]
    fn malformed_bodies_are_bad_requests() {
        for body in [&b"not json"[..], br#"{"arguments": []}"#, br#"{"args": "alice"}"#] {
            let problem = parse_body(body).unwrap_err();
            assert_eq!(problem.status, 400);
        }
    }

    #[test]
    fn invocation_errors_map_to_status_codes() {
        let unauthorized = InvocationError::Unauthorized {
            role: "ADMIN".to_owned(),
            reason: authorizor_sdk::DenyReason::Policy,
        }
        .into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert!(unauthorized.headers().contains_key(axum::http::header::WWW_AUTHENTICATE));

        let missing = InvocationError::NotFound {
            service: "a".to_owned(),
            operation: "b".to_owned(),
        }
        .into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let failed = InvocationError::Fault(OperationFault::failed("boom")).into_response();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid = InvocationError::Fault(OperationFault::invalid_arguments("uid")).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let aborted = InvocationError::Aborted("panic: boom".to_owned()).into_response();
        assert_eq!(aborted.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
