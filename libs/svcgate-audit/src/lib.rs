#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Audit trail for intercepted service operations.
//!
//! Every invocation produces one [`AuditState::InProgress`] record followed by
//! exactly one terminal record ([`AuditState::Success`] or
//! [`AuditState::Exception`]). Both records of one invocation share an
//! `invocation_id`.
//!
//! - [`AuditRecord`] - immutable snapshot of one invocation step
//! - [`AuditSink`] - where records go; [`TracingAuditSink`] writes them to the
//!   `audit` tracing target, [`MemoryAuditSink`] keeps them for inspection
//! - [`render`] - human-readable rendering of arguments and results

pub mod error;
pub mod record;
pub mod render;
pub mod sink;

pub use error::AuditError;
pub use record::{AuditRecord, AuditState};
pub use render::{HIDDEN_VALUE, UNKNOWN_VALUE, render_args, render_value};
pub use sink::{AuditSink, MemoryAuditSink, NoopAuditSink, TracingAuditSink};
