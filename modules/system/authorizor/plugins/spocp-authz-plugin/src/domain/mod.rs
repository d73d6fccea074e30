//! Domain layer for the SPOCP authorizor plugin.

mod client;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod service;
pub mod sexpr;

pub use connection::{PolicyConnection, PolicyConnector, TcpPolicyConnector};
pub use error::PolicyClientError;
pub use protocol::SpocpResponse;
pub use service::Service;
pub use sexpr::{SExpr, role_query};
