//! Domain layer for the static authorizor plugin.

mod client;
pub mod role_file;
pub mod service;

pub use role_file::{RoleFile, RoleFileError};
pub use service::Service;
