#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use identity_provider::NegotiateIdentityProvider;
use identity_provider_sdk::{IdentityProvider, Mechanism};
use static_mechanism_plugin::{StaticCredential, StaticMechanismPluginConfig, TokenMapping};

fn provider() -> NegotiateIdentityProvider {
    let cfg = StaticMechanismPluginConfig {
        static_tokens: vec![
            TokenMapping {
                token: "alice-ticket".to_owned(),
                principal: "alice@EXAMPLE.ORG".to_owned(),
            },
            TokenMapping {
                token: "svc-ticket".to_owned(),
                principal: "batch".to_owned(),
            },
        ],
    };
    let cred = StaticCredential::new("HTTP@svc.example.org", Mechanism::all(), &cfg).unwrap();
    NegotiateIdentityProvider::new(Arc::new(cred))
}

#[tokio::test]
async fn configured_ticket_logs_in_with_realm_role() {
    let principal = provider()
        .login(&STANDARD.encode("alice-ticket"))
        .await
        .expect("login succeeds");

    assert_eq!(principal.name(), "alice@EXAMPLE.ORG");
    assert_eq!(principal.role(), "EXAMPLE.ORG");
}

#[tokio::test]
async fn name_without_realm_uses_whole_name_as_role() {
    let principal = provider()
        .login(&STANDARD.encode("svc-ticket"))
        .await
        .unwrap();

    assert_eq!(principal.role(), "batch");
}

#[tokio::test]
async fn unknown_or_malformed_tickets_yield_none() {
    let provider = provider();

    assert!(provider.login(&STANDARD.encode("forged")).await.is_none());
    assert!(provider.login("@@not-base64@@").await.is_none());
    assert!(provider.login("").await.is_none());
}

#[tokio::test]
async fn concurrent_logins_do_not_share_state() {
    let provider = Arc::new(provider());
    let mut handles = Vec::new();
    for i in 0..16 {
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move {
            let ticket = if i % 2 == 0 { "alice-ticket" } else { "forged" };
            (i, provider.login(&STANDARD.encode(ticket)).await)
        }));
    }

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        assert_eq!(result.is_some(), i % 2 == 0);
    }
}
