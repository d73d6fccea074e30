use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::AuditError;
use crate::record::{AuditRecord, AuditState};

/// Destination for audit records.
///
/// Sinks must not block the invocation path for long; a sink failure is
/// reported to the caller, which logs it and carries on.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditError>;
}

/// Writes each record as one structured event on the `audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        let method_details = record.method_details.join(", ");
        tracing::info!(
            target: "audit",
            invocation_id = %record.invocation_id,
            created = %record.timestamp.to_rfc3339(),
            correlation_id = record.correlation_id.as_deref().unwrap_or_default(),
            operation = %record.operation,
            args = %record.args,
            result = record.result.as_deref().unwrap_or(crate::UNKNOWN_VALUE),
            state = %record.state,
            method_details = %method_details,
            "audit"
        );
        Ok(())
    }
}

/// Keeps records in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn records_for(&self, operation: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.operation == operation)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count_in_state(&self, state: AuditState) -> usize {
        self.records.lock().iter().filter(|r| r.state == state).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// Discards every record. Used when auditing is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, _record: AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}
