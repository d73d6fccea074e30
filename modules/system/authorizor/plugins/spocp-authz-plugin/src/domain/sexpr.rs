//! S-expressions for SPOCP queries.
//!
//! [`fmt::Display`] renders the advanced (human-readable) form used in logs;
//! [`SExpr::canonical`] renders the length-prefixed form sent on the wire.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SExpr {
    Atom(String),
    List(Vec<SExpr>),
}

impl SExpr {
    #[must_use]
    pub fn atom(value: impl Into<String>) -> Self {
        Self::Atom(value.into())
    }

    /// A list whose first element is the tag atom.
    #[must_use]
    pub fn tagged(tag: &str, rest: impl IntoIterator<Item = SExpr>) -> Self {
        let mut items = vec![Self::atom(tag)];
        items.extend(rest);
        Self::List(items)
    }

    /// Canonical encoding: every atom as `<byte-len>:<bytes>`, no whitespace.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            Self::Atom(value) => {
                out.push_str(&value.len().to_string());
                out.push(':');
                out.push_str(value);
            }
            Self::List(items) => {
                out.push('(');
                for item in items {
                    item.write_canonical(out);
                }
                out.push(')');
            }
        }
    }
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(value) => f.write_str(value),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Build the role membership query.
#[must_use]
pub fn role_query(uid: &str, realm: &str, role: &str) -> SExpr {
    SExpr::tagged(
        "j2ee-role",
        [
            SExpr::tagged(
                "identity",
                [
                    SExpr::tagged("uid", [SExpr::atom(uid)]),
                    SExpr::tagged("realm", [SExpr::atom(realm)]),
                ],
            ),
            SExpr::tagged("role", [SExpr::atom(role)]),
        ],
    )
}
