#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Authorizor SDK
//!
//! This crate provides the public API for the `authorizor` module:
//!
//! - [`AuthorizorClient`] - Public API trait for consumers (authenticator, interceptor chain)
//! - [`AuthorizorPluginClient`] - Backend trait for role-check implementations
//! - [`AuthorizationDecision`], [`Verdict`], [`DenyReason`] - Decision model
//! - [`AuthorizorError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authorizor_sdk::AuthorizorClient;
//!
//! let decision = authorizor.check_role(ctx.uid(), operation.required_role()).await;
//! if !decision.allowed() {
//!     return Err(InvocationError::Unauthorized { role: decision.role });
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::AuthorizorClient;
pub use error::AuthorizorError;
pub use models::{AuthorizationDecision, DenyReason, Verdict};
pub use plugin_api::AuthorizorPluginClient;
