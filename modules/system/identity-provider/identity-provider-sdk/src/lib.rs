#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Identity Provider SDK
//!
//! This crate provides the public API for the `identity_provider` module:
//!
//! - [`IdentityProvider`] - Public API trait for consumers (the Negotiate authenticator)
//! - [`AcceptorCredential`] / [`NegotiationContext`] - Security provider seam
//!   implemented by mechanism plugins
//! - [`Mechanism`] - Supported security mechanisms and their OIDs
//! - [`MechanismError`], [`IdentityError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use identity_provider_sdk::IdentityProvider;
//!
//! // Negotiate header value with the scheme prefix stripped
//! match provider.login(token).await {
//!     Some(principal) => { /* authorize principal.name() against principal.role() */ }
//!     None => { /* reject with a Negotiate challenge */ }
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::IdentityProvider;
pub use error::{IdentityError, MechanismError};
pub use models::Mechanism;
pub use plugin_api::{AcceptorCredential, NegotiationContext};
pub use svcgate_security::Principal;
