#![allow(clippy::unwrap_used, clippy::expect_used)]

//! A caller authorized by a remote policy server, end to end.

use std::net::SocketAddr;
use std::sync::Arc;

use authorizor::RoleAuthorizor;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use identity_provider::NegotiateIdentityProvider;
use identity_provider_sdk::Mechanism;
use serde_json::{Value, json};
use service_gateway::{
    GatewayConfig, GatewayDeps, OperationRegistry, OperationSpec, ServiceDescriptor,
    ServiceGateway, StatusInfo,
};
use spocp_authz_plugin::{Service as SpocpService, SpocpPluginConfig};
use static_mechanism_plugin::{StaticCredential, StaticMechanismPluginConfig, TokenMapping};
use svcgate_audit::{AuditState, HIDDEN_VALUE, MemoryAuditSink};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt as _;

fn response_frame(code: &str, text: &str) -> Vec<u8> {
    let payload = format!("{}:{code}{}:{text}", code.len(), text.len());
    format!("{}:{payload}", payload.len()).into_bytes()
}

async fn read_frame(stream: &mut TcpStream) -> Option<String> {
    let mut digits = String::new();
    loop {
        let byte = stream.read_u8().await.ok()?;
        if byte == b':' {
            break;
        }
        digits.push(char::from(byte));
    }
    let mut payload = vec![0u8; digits.parse().ok()?];
    stream.read_exact(&mut payload).await.ok()?;
    String::from_utf8(payload).ok()
}

/// Policy server granting `alice` the `EXAMPLE.ORG` role and nothing else.
async fn policy_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                while let Some(frame) = read_frame(&mut stream).await {
                    if frame.starts_with("6:LOGOUT") {
                        let _ = stream.write_all(&response_frame("203", "Bye")).await;
                        break;
                    }
                    let granted = frame.contains("(3:uid5:alice)")
                        && frame.contains("(4:role11:EXAMPLE.ORG)");
                    let answer = if granted {
                        response_frame("200", "Ok")
                    } else {
                        response_frame("202", "Denied")
                    };
                    let _ = stream.write_all(&answer).await;
                }
            });
        }
    });
    port
}

async fn gateway(policy_port: u16) -> (ServiceGateway, Arc<MemoryAuditSink>) {
    let cfg: GatewayConfig = serde_json::from_value(json!({
        "server": { "bind_addr": "127.0.0.1:0" },
        "negotiate": { "realm": "EXAMPLE.ORG", "target_name": "HTTP@svc.example.org" }
    }))
    .unwrap();

    let mechanism = StaticMechanismPluginConfig {
        static_tokens: vec![TokenMapping {
            token: "alice-ticket".to_owned(),
            principal: "alice@EXAMPLE.ORG".to_owned(),
        }],
    };
    let credential = StaticCredential::new("HTTP@svc.example.org", Mechanism::all(), &mechanism).unwrap();

    let policy = SpocpService::from_config(&SpocpPluginConfig {
        host: "127.0.0.1".to_owned(),
        port: policy_port,
        realm: "EXAMPLE.ORG".to_owned(),
        path: "/".to_owned(),
        timeout_ms: 2000,
    });

    let mut registry = OperationRegistry::new();
    registry
        .register(
            ServiceDescriptor::new("Accounts")
                .operation(
                    OperationSpec::new("getPassword", |_args: Vec<Value>| async move {
                        Ok(json!("s3cret"))
                    })
                    .role("EXAMPLE.ORG")
                    .hide_return_value(),
                )
                .operation(
                    OperationSpec::new("purge", |_args: Vec<Value>| async move { Ok(json!(true)) })
                        .role("ADMIN"),
                ),
        )
        .unwrap();

    let audit = Arc::new(MemoryAuditSink::new());
    let deps = GatewayDeps {
        identity: Arc::new(NegotiateIdentityProvider::new(Arc::new(credential))),
        authorizor: Arc::new(RoleAuthorizor::new(Arc::new(policy))),
        audit: audit.clone(),
        sanitizer: None,
    };
    let gateway = ServiceGateway::new(cfg, deps, registry, StatusInfo::default()).unwrap();
    (gateway, audit)
}

fn alice_calls(operation: &str) -> Request<Body> {
    Request::post(format!("/services/Accounts/{operation}"))
        .header(AUTHORIZATION, format!("Negotiate {}", STANDARD.encode("alice-ticket")))
        .extension(ConnectInfo(SocketAddr::from(([198, 51, 100, 4], 51000))))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn alice_holds_her_realm_role_and_the_call_is_audited_redacted() {
    let port = policy_server().await;
    let (gateway, audit) = gateway(port).await;

    let response = gateway
        .build_router()
        .oneshot(alice_calls("getPassword"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let records = audit.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].state, AuditState::InProgress);
    assert_eq!(records[0].operation, "getPassword");
    assert_eq!(records[1].state, AuditState::Success);
    assert_eq!(records[1].operation, "getPassword");
    assert_eq!(records[1].result.as_deref(), Some(HIDDEN_VALUE));
}

#[tokio::test]
async fn policy_server_denial_leaves_no_audit_trail() {
    let port = policy_server().await;
    let (gateway, audit) = gateway(port).await;

    let response = gateway.build_router().oneshot(alice_calls("purge")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(audit.is_empty());
}

#[tokio::test]
async fn unreachable_policy_server_fails_closed() {
    let unused = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let (gateway, audit) = gateway(unused).await;

    let response = gateway
        .build_router()
        .oneshot(alice_calls("getPassword"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(audit.is_empty());
}
