#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Mechanism Plugin
//!
//! A security provider that maps known tickets to principal names from
//! configuration. It stands in for a Kerberos keytab in development and
//! tests: the client sends `Negotiate <base64(ticket)>` and the ticket text is
//! looked up verbatim.
//!
//! Every ticket is single-leg: the context is established by the first
//! `accept` call or the ticket is rejected.
//!
//! ## Configuration
//!
//! ```yaml
//! mechanism:
//!   static_tokens:
//!     - token: "alice-ticket"
//!       principal: "alice@EXAMPLE.ORG"
//! ```

pub mod config;
pub mod domain;

pub use config::{StaticMechanismPluginConfig, TokenMapping};
pub use domain::StaticCredential;
