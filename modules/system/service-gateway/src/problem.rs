//! RFC 9457 problem details.

use axum::Json;
use axum::http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Problem document returned for every gateway error.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip)]
    www_authenticate: Option<HeaderValue>,
}

impl Problem {
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            www_authenticate: None,
        }
    }

    /// Attach a `WWW-Authenticate` challenge to the response.
    #[must_use]
    pub fn with_challenge(mut self, challenge: HeaderValue) -> Self {
        self.www_authenticate = Some(challenge);
        self
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&HeaderValue> {
        self.www_authenticate.as_ref()
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let challenge = self.www_authenticate.clone();
        let mut response = (status, Json(self)).into_response();
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE));
        if let Some(challenge) = challenge {
            headers.insert(WWW_AUTHENTICATE, challenge);
        }
        response
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn problem_sets_content_type_and_status() {
        let response = Problem::new(StatusCode::NOT_FOUND, "Not Found", "no such operation").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), PROBLEM_CONTENT_TYPE);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn challenge_is_sent_as_header_not_body() {
        let problem = Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "negotiate")
            .with_challenge(HeaderValue::from_static("Negotiate"));
        let body = serde_json::to_value(&problem).unwrap();
        assert!(body.get("www_authenticate").is_none());
        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["status"], 401);

        let response = problem.into_response();
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Negotiate");
    }
}
