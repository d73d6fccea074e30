#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! SPOCP Authorizor Plugin
//!
//! Delegates role checks to a remote SPOCP policy server. For each check the
//! plugin opens a connection, asks
//!
//! ```text
//! (j2ee-role (identity (uid <uid>) (realm <realm>)) (role <role>))
//! ```
//!
//! and logs out again. The uid is sent without realm or instance qualifiers.
//! Only a `200` answer grants; every failure denies.
//!
//! ## Configuration
//!
//! ```yaml
//! authorizor:
//!   backend: policy_server
//!   policy_server:
//!     host: "spocp.example.org"
//!     port: 4751
//!     realm: "EXAMPLE.ORG"
//!     path: "/"
//!     timeout_ms: 5000
//! ```

pub mod config;
pub mod domain;

pub use config::SpocpPluginConfig;
pub use domain::{
    PolicyClientError, PolicyConnection, PolicyConnector, SExpr, Service, SpocpResponse,
    TcpPolicyConnector, role_query,
};
