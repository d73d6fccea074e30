//! Identity Provider Module
//!
//! Converts the base64 token carried by an `Authorization: Negotiate` header
//! into a [`svcgate_security::Principal`] using the acceptor credential
//! supplied by a mechanism plugin.
//!
//! Provides [`NegotiateIdentityProvider`], the implementation of
//! [`identity_provider_sdk::IdentityProvider`] handed to the gateway at
//! start-up.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod domain;

pub use domain::{MAX_ACCEPT_ROUNDS, NegotiateIdentityProvider, Service};
