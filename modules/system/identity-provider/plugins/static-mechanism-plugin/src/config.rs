//! Configuration for the static mechanism plugin.

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticMechanismPluginConfig {
    /// Ticket-to-principal mappings.
    pub static_tokens: Vec<TokenMapping>,
}

/// Maps a static ticket to the principal it authenticates.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// Ticket text the client base64-encodes into its Negotiate header.
    pub token: String,
    /// Source name reported once the context is established (`user@REALM`).
    pub principal: String,
}

impl std::fmt::Debug for TokenMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMapping")
            .field("token", &"[REDACTED]")
            .field("principal", &self.principal)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_tickets() {
        let cfg = StaticMechanismPluginConfig {
            static_tokens: vec![TokenMapping {
                token: "alice-ticket".to_owned(),
                principal: "alice@EXAMPLE.ORG".to_owned(),
            }],
        };
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("alice@EXAMPLE.ORG"));
        assert!(!rendered.contains("alice-ticket"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: Result<StaticMechanismPluginConfig, _> =
            serde_json::from_str(r#"{"static_tokens": [], "mode": "accept_all"}"#);
        assert!(parsed.is_err());
    }
}
