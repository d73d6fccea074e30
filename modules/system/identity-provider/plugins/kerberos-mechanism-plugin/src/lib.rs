#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Kerberos Mechanism Plugin
//!
//! A security provider backed by the system GSS-API library. One acceptor
//! credential is acquired at start-up for the configured target name
//! (`HTTP@host`, host-based service form) and mechanism set; every login gets
//! its own GSS server context derived from it.
//!
//! The service key comes from the keytab named by `KRB5_KTNAME`. When
//! `mechanism.keytab` is set, start-up checks that the file exists and that
//! `KRB5_KTNAME` points at it.
//!
//! ## Configuration
//!
//! ```yaml
//! mechanism:
//!   provider: kerberos
//!   keytab: /etc/svcgate/http.keytab
//! ```

pub mod config;
pub mod domain;

pub use config::{KEYTAB_ENV, KerberosMechanismPluginConfig};
pub use domain::KerberosCredential;
