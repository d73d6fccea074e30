//! Domain layer for the identity provider.

pub mod error;
pub mod local_client;
pub mod service;

pub use local_client::NegotiateIdentityProvider;
pub use service::{MAX_ACCEPT_ROUNDS, Service};
