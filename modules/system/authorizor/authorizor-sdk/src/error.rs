//! Error types for the authorizor module.

use thiserror::Error;

/// Errors a backend can report while checking a role.
///
/// These represent infrastructure failures only. Denial by policy is
/// expressed as `Ok(false)`, not as an error variant.
#[derive(Debug, Error)]
pub enum AuthorizorError {
    /// The policy source could not be consulted (connection, protocol, timeout).
    #[error("policy backend unavailable: {0}")]
    Backend(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
