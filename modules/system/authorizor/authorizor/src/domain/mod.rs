//! Domain layer for the authorizor.

pub mod local_client;
pub mod service;

pub use local_client::RoleAuthorizor;
pub use service::Service;
