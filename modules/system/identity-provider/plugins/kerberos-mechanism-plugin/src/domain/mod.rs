//! Domain layer for the Kerberos mechanism plugin.

pub mod client;
pub mod service;

pub use client::KerberosContext;
pub use service::KerberosCredential;
