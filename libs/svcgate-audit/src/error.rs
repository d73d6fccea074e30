/// Errors that can occur while writing audit records.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The sink could not persist the record.
    #[error("audit sink error: {0}")]
    Sink(String),

    /// A record could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
