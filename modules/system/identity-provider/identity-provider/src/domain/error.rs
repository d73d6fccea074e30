//! Log classification for failed logins.

use identity_provider_sdk::{IdentityError, MechanismError};

/// How loudly a failed login should be reported.
///
/// Client-caused failures are routine (stale tickets, browsers probing) and
/// stay at `debug`; a broken acceptor credential is an operator problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Routine,
    Operational,
}

#[must_use]
pub fn classify(err: &IdentityError) -> Severity {
    match err {
        IdentityError::Mechanism(
            MechanismError::CredentialUnavailable(_) | MechanismError::Internal(_),
        ) => Severity::Operational,
        IdentityError::EmptyToken
        | IdentityError::Decode(_)
        | IdentityError::Mechanism(_)
        | IdentityError::ContinuationRequired { .. }
        | IdentityError::MissingSourceName => Severity::Routine,
    }
}
