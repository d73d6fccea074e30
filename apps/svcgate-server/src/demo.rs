//! Demo services exposed by the server binary.
//!
//! - `Status.ping`: public
//! - `Directory.lookup`, `Directory.getPassword`: require the realm role
//! - `Directory.purge`: requires `ADMIN`

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Value, json};
use service_gateway::{OperationFault, OperationRegistry, OperationSpec, RegistryError, ServiceDescriptor};

#[derive(Debug, Clone)]
struct Entry {
    display_name: String,
    password: String,
}

/// In-memory account directory backing the `Directory` service.
#[derive(Debug, Default)]
struct Directory {
    entries: RwLock<HashMap<String, Entry>>,
}

impl Directory {
    fn seeded() -> Self {
        let entries = [
            ("alice", "Alice Example", "correct horse"),
            ("bob", "Bob Example", "battery staple"),
        ]
        .into_iter()
        .map(|(uid, display_name, password)| {
            (
                uid.to_owned(),
                Entry {
                    display_name: display_name.to_owned(),
                    password: password.to_owned(),
                },
            )
        })
        .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    fn entry(&self, uid: &str) -> Result<Entry, OperationFault> {
        self.entries
            .read()
            .get(uid)
            .cloned()
            .ok_or_else(|| OperationFault::failed(format!("no such user '{uid}'")))
    }
}

fn uid_arg(args: &[Value]) -> Result<String, OperationFault> {
    match args.first() {
        Some(Value::String(uid)) if !uid.is_empty() => Ok(uid.clone()),
        _ => Err(OperationFault::invalid_arguments("expected a uid string")),
    }
}

/// Register the demo services.
///
/// # Errors
/// Returns [`RegistryError`] if a service is already registered.
pub fn register(registry: &mut OperationRegistry, realm: &str) -> Result<(), RegistryError> {
    registry.register(
        ServiceDescriptor::new("Status")
            .operation(OperationSpec::new("ping", |_args| async { Ok(json!("pong")) })),
    )?;

    let directory = Arc::new(Directory::seeded());
    let lookup = Arc::clone(&directory);
    let password = Arc::clone(&directory);
    let purge = directory;

    registry.register(
        ServiceDescriptor::new("Directory")
            .role(realm)
            .operation(
                OperationSpec::new("lookup", move |args| {
                    let directory = Arc::clone(&lookup);
                    async move {
                        let uid = uid_arg(&args)?;
                        let entry = directory.entry(&uid)?;
                        Ok(json!({ "uid": uid, "display_name": entry.display_name }))
                    }
                })
                .audit_details("reads account"),
            )
            .operation(
                OperationSpec::new("getPassword", move |args| {
                    let directory = Arc::clone(&password);
                    async move {
                        let uid = uid_arg(&args)?;
                        Ok(Value::String(directory.entry(&uid)?.password))
                    }
                })
                .hide_return_value()
                .audit_details("reads account, reads credentials"),
            )
            .operation(
                OperationSpec::new("purge", move |args| {
                    let directory = Arc::clone(&purge);
                    async move {
                        let uid = uid_arg(&args)?;
                        let removed = directory.entries.write().remove(&uid).is_some();
                        Ok(json!(removed))
                    }
                })
                .role("ADMIN")
                .audit_details("deletes account"),
            ),
    )
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn registry() -> OperationRegistry {
        let mut registry = OperationRegistry::new();
        register(&mut registry, "EXAMPLE.ORG").unwrap();
        registry
    }

    #[test]
    fn roles_follow_the_realm() {
        let registry = registry();
        assert_eq!(registry.resolve("Status", "ping").unwrap().required_role(), None);
        assert_eq!(
            registry.resolve("Directory", "lookup").unwrap().required_role(),
            Some("EXAMPLE.ORG")
        );
        assert_eq!(
            registry.resolve("Directory", "purge").unwrap().required_role(),
            Some("ADMIN")
        );
        assert!(registry.resolve("Directory", "getPassword").unwrap().hides_return_value());
    }

    #[tokio::test]
    async fn lookup_and_purge() {
        let registry = registry();
        let lookup = registry.resolve("Directory", "lookup").unwrap();
        let purge = registry.resolve("Directory", "purge").unwrap();

        let found = (lookup.handler())(vec![json!("alice")]).await.unwrap();
        assert_eq!(found["display_name"], "Alice Example");

        assert_eq!((purge.handler())(vec![json!("alice")]).await.unwrap(), json!(true));
        assert_eq!((purge.handler())(vec![json!("alice")]).await.unwrap(), json!(false));
        assert!(matches!(
            (lookup.handler())(vec![json!("alice")]).await,
            Err(OperationFault::Failed(_))
        ));
    }

    #[tokio::test]
    async fn missing_uid_is_invalid() {
        let registry = registry();
        let op = registry.resolve("Directory", "getPassword").unwrap();
        assert!(matches!(
            (op.handler())(vec![json!(3)]).await,
            Err(OperationFault::InvalidArguments(_))
        ));
    }

    #[test]
    fn registering_twice_fails() {
        let mut registry = registry();
        assert!(register(&mut registry, "EXAMPLE.ORG").is_err());
    }
}
