//! Policy client errors.

/// Errors talking to the policy server.
#[derive(Debug, thiserror::Error)]
pub enum PolicyClientError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u128,
    },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("connection closed by server")]
    Closed,
}
