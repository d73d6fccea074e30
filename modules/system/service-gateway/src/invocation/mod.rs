//! Invocation of registered service operations.
//!
//! Every call runs through the [`InterceptorChain`]: arguments are
//! sanitized, the caller is authorized against the operation's required role,
//! and the invocation is audited.

pub mod chain;
pub mod error;
pub mod registry;
pub mod sanitize;

pub use chain::InterceptorChain;
pub use error::{InvocationError, OperationFault, RegistryError};
pub use registry::{
    OperationDescription, OperationFuture, OperationHandler, OperationRegistry, OperationSpec,
    ResolvedOperation, ServiceDescription, ServiceDescriptor,
};
pub use sanitize::{SanitizeError, Sanitizer, TrimSanitizer};
