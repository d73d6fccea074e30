//! Error types for the identity provider module.

use thiserror::Error;

/// Errors raised by a security mechanism implementation.
#[derive(Debug, Error)]
pub enum MechanismError {
    /// The mechanism rejected the input token.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// The acceptor credential cannot be used (missing, expired).
    #[error("acceptor credential unavailable: {0}")]
    CredentialUnavailable(String),

    /// The token asked for a mechanism the credential was not created for.
    #[error("unsupported mechanism: {0}")]
    UnsupportedMechanism(String),

    /// An internal mechanism failure.
    #[error("internal mechanism error: {0}")]
    Internal(String),
}

/// Reasons a login attempt failed.
///
/// Never crosses the [`crate::IdentityProvider`] boundary: `login` maps every
/// variant to `None` after logging it.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("empty token")]
    EmptyToken,

    #[error("token is not valid base64: {0}")]
    Decode(String),

    #[error(transparent)]
    Mechanism(#[from] MechanismError),

    /// The mechanism needs another leg, which this gateway does not perform.
    #[error("negotiation not established after {rounds} round(s)")]
    ContinuationRequired { rounds: usize },

    #[error("established context has no source name")]
    MissingSourceName,
}
