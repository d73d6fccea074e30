//! Domain models for the authorizor module.

use serde::{Deserialize, Serialize};

/// Why a role check denied access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "details", rename_all = "snake_case")]
pub enum DenyReason {
    /// A role is required but the caller has no established identity.
    NotAuthenticated,
    /// The backend answered and the caller does not hold the role.
    Policy,
    /// The backend could not be consulted; denied fail-closed.
    BackendError(String),
}

/// Outcome of one role check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No role was required.
    Public,
    /// The caller holds the required role.
    Granted,
    Denied(DenyReason),
}

/// Result of evaluating `uid` against a required `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    /// The uid that was evaluated, if the caller had one.
    pub uid: Option<String>,
    /// The role that was evaluated; `None` for public operations.
    pub role: Option<String>,
    pub verdict: Verdict,
}

impl AuthorizationDecision {
    #[must_use]
    pub fn public(uid: Option<&str>) -> Self {
        Self {
            uid: uid.map(str::to_owned),
            role: None,
            verdict: Verdict::Public,
        }
    }

    #[must_use]
    pub fn granted(uid: &str, role: &str) -> Self {
        Self {
            uid: Some(uid.to_owned()),
            role: Some(role.to_owned()),
            verdict: Verdict::Granted,
        }
    }

    #[must_use]
    pub fn denied(uid: Option<&str>, role: &str, reason: DenyReason) -> Self {
        Self {
            uid: uid.map(str::to_owned),
            role: Some(role.to_owned()),
            verdict: Verdict::Denied(reason),
        }
    }

    /// Whether the call may proceed.
    #[must_use]
    pub fn allowed(&self) -> bool {
        matches!(self.verdict, Verdict::Public | Verdict::Granted)
    }

    #[must_use]
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match &self.verdict {
            Verdict::Denied(reason) => Some(reason),
            Verdict::Public | Verdict::Granted => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn public_and_granted_allow() {
        assert!(AuthorizationDecision::public(None).allowed());
        assert!(AuthorizationDecision::granted("alice@EXAMPLE.ORG", "EXAMPLE.ORG").allowed());
    }

    #[test]
    fn backend_errors_are_distinguishable_from_policy_denials() {
        let policy = AuthorizationDecision::denied(Some("alice"), "ADMIN", DenyReason::Policy);
        let backend = AuthorizationDecision::denied(
            Some("alice"),
            "ADMIN",
            DenyReason::BackendError("connection refused".to_owned()),
        );

        assert!(!policy.allowed());
        assert!(!backend.allowed());
        assert_ne!(policy.deny_reason(), backend.deny_reason());
        assert_eq!(policy.role.as_deref(), Some("ADMIN"));
    }
}
