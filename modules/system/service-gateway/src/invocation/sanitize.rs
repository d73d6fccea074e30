//! Argument sanitizers run ahead of authorization.

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[error("sanitization failed: {0}")]
pub struct SanitizeError(pub String);

/// Rewrites operation arguments before authorization.
pub trait Sanitizer: Send + Sync {
    /// # Errors
    /// Returns [`SanitizeError`] if the arguments cannot be rewritten; the
    /// caller then proceeds with the original arguments.
    fn sanitize(&self, args: &[Value]) -> Result<Vec<Value>, SanitizeError>;
}

/// Trims surrounding whitespace from top-level string arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimSanitizer;

impl Sanitizer for TrimSanitizer {
    fn sanitize(&self, args: &[Value]) -> Result<Vec<Value>, SanitizeError> {
        Ok(args
            .iter()
            .map(|arg| match arg {
                Value::String(s) => Value::String(s.trim().to_owned()),
                other => other.clone(),
            })
            .collect())
    }
}
