#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Authorizor Plugin
//!
//! Backends whose policy is fixed at start-up.
//!
//! ## Mode: `allow_all` (default)
//!
//! Every role check succeeds. Used when no policy backend is configured.
//!
//! ## Mode: `role_file`
//!
//! Role membership is read once from a properties file mapping each role to a
//! comma-separated list of principals:
//!
//! ```text
//! # roles.properties
//! EXAMPLE.ORG = alice@EXAMPLE.ORG, bob@EXAMPLE.ORG
//! ADMIN: carol
//! ```
//!
//! A role missing from the file denies everyone.
//!
//! ## Configuration
//!
//! ```yaml
//! authorizor:
//!   backend: role_file
//!   role_file:
//!     path: "/etc/svcgate/roles.properties"
//! ```

pub mod config;
pub mod domain;

pub use config::{AuthZMode, StaticAuthZPluginConfig};
pub use domain::{RoleFile, RoleFileError, Service};
