//! Authorizor Module
//!
//! Wraps the configured backend (allow-all, role file, policy server) in the
//! rules every backend shares: an absent role is public, a missing identity
//! cannot satisfy a role, and a backend failure denies.
//!
//! Provides [`RoleAuthorizor`], the [`authorizor_sdk::AuthorizorClient`]
//! handed to the gateway at start-up.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod domain;

pub use domain::{RoleAuthorizor, Service};
