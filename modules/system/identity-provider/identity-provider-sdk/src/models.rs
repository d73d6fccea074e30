//! Domain models for the identity provider module.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Security mechanisms the acceptor credential can be created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// Kerberos V5.
    Krb5,
    /// SPNEGO pseudo-mechanism wrapping Kerberos.
    Spnego,
}

impl Mechanism {
    /// Object identifier in dotted notation.
    #[must_use]
    pub fn oid(self) -> &'static str {
        match self {
            Self::Krb5 => "1.2.840.113554.1.2.2",
            Self::Spnego => "1.3.6.1.5.5.2",
        }
    }

    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![Self::Krb5, Self::Spnego]
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Krb5 => f.write_str("krb5"),
            Self::Spnego => f.write_str("spnego"),
        }
    }
}
