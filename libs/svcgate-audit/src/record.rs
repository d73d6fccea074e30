use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::render::UNKNOWN_VALUE;

/// Lifecycle state of an audited invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditState {
    /// The operation was authorized and is about to run.
    InProgress,
    /// The operation returned normally.
    Success,
    /// The operation returned a fault or panicked.
    Exception,
}

impl AuditState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Exception => "EXCEPTION",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for AuditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit record for one step of an intercepted invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Shared by the in-progress record and the terminal record of one call.
    pub invocation_id: Uuid,
    /// When this record was produced.
    pub timestamp: DateTime<Utc>,
    /// Request-scoped id; absent when the request carried none.
    #[serde(default)]
    pub correlation_id: Option<String>,
    /// Name of the invoked operation.
    pub operation: String,
    /// Human-readable argument rendering.
    pub args: String,
    /// Result rendering (redacted for sensitive operations), fault rendering
    /// for exceptions, absent while in progress.
    #[serde(default)]
    pub result: Option<String>,
    pub state: AuditState,
    /// Descriptive tags declared on the operation.
    #[serde(default)]
    pub method_details: Vec<String>,
}

impl AuditRecord {
    /// Start a new invocation: produces the in-progress record.
    #[must_use]
    pub fn in_progress(
        correlation_id: Option<String>,
        operation: impl Into<String>,
        args: impl Into<String>,
        method_details: Vec<String>,
    ) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            correlation_id,
            operation: operation.into(),
            args: args.into(),
            result: None,
            state: AuditState::InProgress,
            method_details,
        }
    }

    /// Terminal record for a normal return.
    #[must_use]
    pub fn succeeded(&self, result: impl Into<String>) -> Self {
        self.terminal(AuditState::Success, result.into())
    }

    /// Terminal record for a fault.
    #[must_use]
    pub fn failed(&self, fault: impl Into<String>) -> Self {
        self.terminal(AuditState::Exception, fault.into())
    }

    fn terminal(&self, state: AuditState, result: String) -> Self {
        Self {
            invocation_id: self.invocation_id,
            timestamp: Utc::now(),
            correlation_id: self.correlation_id.clone(),
            operation: self.operation.clone(),
            args: self.args.clone(),
            result: Some(result),
            state,
            method_details: self.method_details.clone(),
        }
    }
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditRecord(created:{}, invocation:{}, operation:{}, args:{}, result:{}, state:{}, methodDetails:[{}])",
            self.timestamp.to_rfc3339(),
            self.invocation_id,
            self.operation,
            self.args,
            self.result.as_deref().unwrap_or(UNKNOWN_VALUE),
            self.state,
            self.method_details.join(", ")
        )
    }
}
