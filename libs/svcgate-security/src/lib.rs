#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Caller identity types shared by the authentication and invocation layers.
//!
//! - [`Principal`] - an identity established by one successful negotiation
//! - [`CallerContext`] - everything the invocation layer knows about a caller
//! - [`normalize_uid`] - strips realm/instance qualifiers from a principal name

pub mod context;
pub mod principal;

pub use context::CallerContext;
pub use principal::{Principal, normalize_uid};
