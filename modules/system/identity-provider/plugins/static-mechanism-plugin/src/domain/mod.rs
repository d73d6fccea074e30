//! Domain layer for the static mechanism plugin.

pub mod client;
pub mod service;

pub use client::StaticContext;
pub use service::StaticCredential;
