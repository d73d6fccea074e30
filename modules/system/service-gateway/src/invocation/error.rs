//! Errors raised by operations, the interceptor chain and the registry.

use authorizor_sdk::DenyReason;

/// Failure raised by an operation itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationFault {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Failed(String),
}

impl OperationFault {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }
}

/// Why an invocation did not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("You do not have the required role '{role}'")]
    Unauthorized { role: String, reason: DenyReason },

    #[error("no operation '{operation}' on service '{service}'")]
    NotFound { service: String, operation: String },

    #[error(transparent)]
    Fault(#[from] OperationFault),

    /// The operation panicked or its task was cancelled.
    #[error("operation aborted: {0}")]
    Aborted(String),
}

/// Start-up errors while registering operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("service '{0}' is already registered")]
    DuplicateService(String),

    #[error("operation '{operation}' is declared twice on service '{service}'")]
    DuplicateOperation { service: String, operation: String },

    #[error("service and operation names must not be empty")]
    EmptyName,
}
