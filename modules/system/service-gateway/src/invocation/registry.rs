//! Static registry of exposed operations.
//!
//! Services and their operations are registered once at start-up together
//! with their metadata (required role, result hiding, audit details). Lookups
//! at request time never consult anything but this table.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use super::error::{OperationFault, RegistryError};

pub type OperationFuture = BoxFuture<'static, Result<Value, OperationFault>>;
pub type OperationHandler = Arc<dyn Fn(Vec<Value>) -> OperationFuture + Send + Sync>;

/// One exposed operation and its method-level metadata.
#[derive(Clone)]
pub struct OperationSpec {
    name: String,
    role: Option<String>,
    hide_return_value: bool,
    audit_details: Vec<String>,
    handler: OperationHandler,
}

impl OperationSpec {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, OperationFault>> + Send + 'static,
    {
        Self {
            name: name.into(),
            role: None,
            hide_return_value: false,
            audit_details: Vec::new(),
            handler: Arc::new(move |args| handler(args).boxed()),
        }
    }

    /// Role required for this operation; overrides the service role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Record `******` instead of the result in the audit trail.
    #[must_use]
    pub fn hide_return_value(mut self) -> Self {
        self.hide_return_value = true;
        self
    }

    /// Comma-separated descriptive tags copied into every audit record.
    #[must_use]
    pub fn audit_details(mut self, details: &str) -> Self {
        self.audit_details = details
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned)
            .collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("hide_return_value", &self.hide_return_value)
            .field("audit_details", &self.audit_details)
            .finish_non_exhaustive()
    }
}

/// A service: a named group of operations sharing a class-level role.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    name: String,
    role: Option<String>,
    operations: Vec<OperationSpec>,
}

impl ServiceDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            operations: Vec::new(),
        }
    }

    /// Role required for every operation without its own role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn operation(mut self, spec: OperationSpec) -> Self {
        self.operations.push(spec);
        self
    }
}

/// An operation with its effective metadata, ready to invoke.
pub struct ResolvedOperation {
    service: String,
    spec: OperationSpec,
    class_role: Option<String>,
}

impl ResolvedOperation {
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Method-level role if declared, else the service role.
    #[must_use]
    pub fn required_role(&self) -> Option<&str> {
        self.spec.role.as_deref().or(self.class_role.as_deref())
    }

    #[must_use]
    pub fn hides_return_value(&self) -> bool {
        self.spec.hide_return_value
    }

    #[must_use]
    pub fn audit_details(&self) -> &[String] {
        &self.spec.audit_details
    }

    #[must_use]
    pub fn handler(&self) -> &OperationHandler {
        &self.spec.handler
    }
}

impl fmt::Debug for ResolvedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOperation")
            .field("service", &self.service)
            .field("operation", &self.spec.name)
            .field("required_role", &self.required_role())
            .finish_non_exhaustive()
    }
}

/// Operation metadata published to introspection requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationDescription {
    pub name: String,
    pub required_role: Option<String>,
    pub hide_return_value: bool,
    pub audit_details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescription {
    pub service: String,
    pub operations: Vec<OperationDescription>,
}

/// All registered operations, keyed by service and operation name.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    services: HashMap<String, HashMap<String, Arc<ResolvedOperation>>>,
}

impl OperationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service with all its operations.
    ///
    /// Nothing is registered if the descriptor is rejected.
    ///
    /// # Errors
    /// Returns [`RegistryError`] on an empty name, a service registered twice
    /// or an operation declared twice.
    pub fn register(&mut self, descriptor: ServiceDescriptor) -> Result<(), RegistryError> {
        let ServiceDescriptor {
            name: service,
            role,
            operations,
        } = descriptor;

        if service.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.services.contains_key(&service) {
            return Err(RegistryError::DuplicateService(service));
        }

        let mut table = HashMap::with_capacity(operations.len());
        for spec in operations {
            if spec.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if table.contains_key(&spec.name) {
                return Err(RegistryError::DuplicateOperation {
                    service,
                    operation: spec.name,
                });
            }
            let resolved = ResolvedOperation {
                service: service.clone(),
                class_role: role.clone(),
                spec,
            };
            table.insert(resolved.spec.name.clone(), Arc::new(resolved));
        }

        tracing::info!(
            service = %service,
            operations = table.len(),
            role = role.as_deref().unwrap_or("<none>"),
            "Registered service"
        );
        self.services.insert(service, table);
        Ok(())
    }

    #[must_use]
    pub fn resolve(&self, service: &str, operation: &str) -> Option<Arc<ResolvedOperation>> {
        self.services.get(service)?.get(operation).cloned()
    }

    /// Describe a service's operations, sorted by name.
    #[must_use]
    pub fn describe(&self, service: &str) -> Option<ServiceDescription> {
        let table = self.services.get(service)?;
        let mut operations: Vec<OperationDescription> = table
            .values()
            .map(|op| OperationDescription {
                name: op.name().to_owned(),
                required_role: op.required_role().map(str::to_owned),
                hide_return_value: op.hides_return_value(),
                audit_details: op.audit_details().to_vec(),
            })
            .collect();
        operations.sort_by(|a, b| a.name.cmp(&b.name));
        Some(ServiceDescription {
            service: service.to_owned(),
            operations,
        })
    }

    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.services.values().map(HashMap::len).sum()
    }
}
