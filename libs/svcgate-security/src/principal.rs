use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretBox};

/// Identity established by one successful Negotiate exchange.
///
/// Created by the identity provider after the negotiation context reports
/// established, owned by the authentication layer for a single request and
/// never persisted. The validated mechanism token is kept behind
/// [`SecretBox`] so `Debug` output never reveals it.
#[derive(Clone)]
pub struct Principal {
    /// Realm-qualified caller name, e.g. `alice@EXAMPLE.ORG`.
    name: String,
    /// Coarse default grouping derived from the realm part of `name`.
    role: String,
    raw_token: Arc<SecretBox<[u8]>>,
}

impl Principal {
    /// Create a principal from the source name reported by the mechanism.
    ///
    /// The role is derived from the text after the first `@`. A name without
    /// a realm separator yields the whole name as its role.
    #[must_use]
    pub fn new(name: impl Into<String>, raw_token: Vec<u8>) -> Self {
        let name = name.into();
        let role = derive_role(&name).to_owned();
        Self {
            name,
            role,
            raw_token: Arc::new(SecretBox::new(raw_token.into_boxed_slice())),
        }
    }

    /// Realm-qualified principal name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role derived from the realm part of the name.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Principal name with realm and instance qualifiers stripped.
    #[must_use]
    pub fn uid(&self) -> &str {
        normalize_uid(&self.name)
    }

    /// The validated mechanism token. Never log or audit this value.
    #[must_use]
    pub fn raw_token(&self) -> &[u8] {
        self.raw_token.expose_secret()
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("raw_token", &format_args!("[REDACTED; {} bytes]", self.raw_token().len()))
            .finish()
    }
}

fn derive_role(name: &str) -> &str {
    name.split_once('@').map_or(name, |(_, realm)| realm)
}

/// Strip everything from the first `/` (instance) or `@` (realm) onwards.
///
/// `alice/admin@EXAMPLE.ORG` and `alice@EXAMPLE.ORG` both normalize to `alice`.
#[must_use]
pub fn normalize_uid(name: &str) -> &str {
    name.find(['/', '@']).map_or(name, |idx| &name[..idx])
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn role_is_realm_part_of_name() {
        let principal = Principal::new("alice@EXAMPLE.ORG", b"ticket".to_vec());

        assert_eq!(principal.name(), "alice@EXAMPLE.ORG");
        assert_eq!(principal.role(), "EXAMPLE.ORG");
        assert_eq!(principal.uid(), "alice");
    }

    #[test]
    fn role_uses_first_separator() {
        let principal = Principal::new("svc@SUB@EXAMPLE.ORG", Vec::new());
        assert_eq!(principal.role(), "SUB@EXAMPLE.ORG");
    }

    #[test]
    fn name_without_realm_is_its_own_role() {
        let principal = Principal::new("localuser", Vec::new());
        assert_eq!(principal.role(), "localuser");
        assert_eq!(principal.uid(), "localuser");
    }

    #[test]
    fn normalize_uid_strips_instance_and_realm() {
        assert_eq!(normalize_uid("alice/admin@EXAMPLE.ORG"), "alice");
        assert_eq!(normalize_uid("alice@EXAMPLE.ORG"), "alice");
        assert_eq!(normalize_uid("HTTP/host.example.org"), "HTTP");
        assert_eq!(normalize_uid("bob"), "bob");
        assert_eq!(normalize_uid(""), "");
    }

    #[test]
    fn debug_output_redacts_token() {
        let principal = Principal::new("alice@EXAMPLE.ORG", b"super-secret-ticket".to_vec());
        let rendered = format!("{principal:?}");

        assert!(!rendered.contains("super-secret-ticket"));
        assert!(rendered.contains("19 bytes"));
        assert_eq!(principal.raw_token(), b"super-secret-ticket");
    }

    #[test]
    fn clones_share_token() {
        let principal = Principal::new("alice@EXAMPLE.ORG", b"abc".to_vec());
        let cloned = principal.clone();
        assert_eq!(cloned.raw_token(), principal.raw_token());
        assert_eq!(cloned.name(), principal.name());
    }
}
