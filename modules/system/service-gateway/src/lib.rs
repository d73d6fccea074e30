//! Service Gateway Module
//!
//! HTTP front for statically registered service operations. Every request
//! except the status page passes the Negotiate (SPNEGO) authenticator; every
//! operation call passes the interceptor chain (sanitize, authorize, audit).
//!
//! ```text
//! POST /services/{service}/{operation}   {"args": [...]}  -> {"result": ...}
//! GET  /services/{service}?wsdl           operation metadata, no identity needed
//! GET  / , /status.html                   build information
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod auth;
pub mod challenge;
pub mod config;
pub mod gateway;
pub mod invocation;
pub mod middleware;
pub mod problem;
pub mod routes;
pub mod status;

pub use auth::{AuthenticationOutcome, NegotiateAuthenticator, RejectReason};
pub use challenge::ChallengeLedger;
pub use config::{AuditConfig, ConfigError, GatewayConfig, NegotiateConfig, ServerConfig};
pub use gateway::{GatewayDeps, ServiceGateway};
pub use invocation::{
    InterceptorChain, InvocationError, OperationFault, OperationRegistry, OperationSpec,
    RegistryError, ServiceDescriptor,
};
pub use problem::Problem;
pub use status::StatusInfo;
