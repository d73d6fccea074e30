#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;
use std::sync::Arc;

use authorizor::RoleAuthorizor;
use authorizor_sdk::{AuthorizorClient, DenyReason, Verdict};
use static_authz_plugin::{AuthZMode, Service, StaticAuthZPluginConfig};

fn role_file_authorizor(contents: &str) -> (RoleAuthorizor, tempfile::NamedTempFile) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    let cfg = StaticAuthZPluginConfig {
        mode: AuthZMode::RoleFile {
            path: file.path().to_path_buf(),
        },
    };
    let service = Service::from_config(&cfg).unwrap();
    (RoleAuthorizor::new(Arc::new(service)), file)
}

#[tokio::test]
async fn absent_role_is_public_even_when_file_lists_nobody() {
    let (authorizor, _file) = role_file_authorizor("# no roles at all\n");

    let decision = authorizor.check_role(Some("alice@EXAMPLE.ORG"), None).await;
    assert_eq!(decision.verdict, Verdict::Public);

    let decision = authorizor.check_role(None, None).await;
    assert!(decision.allowed());
}

#[tokio::test]
async fn unlisted_admin_role_is_denied_by_policy() {
    let (authorizor, _file) = role_file_authorizor("EXAMPLE.ORG = alice@EXAMPLE.ORG\n");

    let decision = authorizor
        .check_role(Some("alice@EXAMPLE.ORG"), Some("ADMIN"))
        .await;
    assert_eq!(decision.deny_reason(), Some(&DenyReason::Policy));
    assert_eq!(decision.role.as_deref(), Some("ADMIN"));

    let decision = authorizor
        .check_role(Some("alice@EXAMPLE.ORG"), Some("EXAMPLE.ORG"))
        .await;
    assert_eq!(decision.verdict, Verdict::Granted);
}

#[test]
fn mode_deserializes_from_config() {
    let cfg: StaticAuthZPluginConfig =
        serde_json::from_str(r#"{"mode": {"role_file": {"path": "/etc/svcgate/roles.properties"}}}"#)
            .unwrap();
    assert_eq!(
        cfg.mode,
        AuthZMode::RoleFile {
            path: "/etc/svcgate/roles.properties".into()
        }
    );

    let cfg: StaticAuthZPluginConfig = serde_json::from_str(r#"{"mode": "allow_all"}"#).unwrap();
    assert_eq!(cfg.mode, AuthZMode::AllowAll);
}
