//! Connections to the policy server.

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::error::PolicyClientError;
use super::protocol::{SpocpResponse, logout_frame, parse_response, query_frame, read_frame};
use super::sexpr::SExpr;

/// Opens one connection per role check.
#[async_trait]
pub trait PolicyConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn PolicyConnection>, PolicyClientError>;

    /// Where connections go, for logs.
    fn endpoint(&self) -> String;
}

/// An open policy server session.
#[async_trait]
pub trait PolicyConnection: Send {
    /// Ask `query` under rule `path` and return the final response.
    async fn query(&mut self, path: &str, query: &SExpr)
    -> Result<SpocpResponse, PolicyClientError>;

    /// End the session.
    async fn logout(&mut self) -> Result<(), PolicyClientError>;
}

/// TCP connector for a SPOCP server.
#[derive(Debug, Clone)]
pub struct TcpPolicyConnector {
    address: String,
}

impl TcpPolicyConnector {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl PolicyConnector for TcpPolicyConnector {
    async fn connect(&self) -> Result<Box<dyn PolicyConnection>, PolicyClientError> {
        let stream = TcpStream::connect(&self.address).await?;
        stream.set_nodelay(true)?;
        Ok(Box::new(TcpPolicyConnection {
            stream: BufReader::new(stream),
        }))
    }

    fn endpoint(&self) -> String {
        self.address.clone()
    }
}

struct TcpPolicyConnection {
    stream: BufReader<TcpStream>,
}

impl TcpPolicyConnection {
    async fn send(&mut self, bytes: &[u8]) -> Result<(), PolicyClientError> {
        let stream = self.stream.get_mut();
        stream.write_all(bytes).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<SpocpResponse, PolicyClientError> {
        let payload = read_frame(&mut self.stream).await?;
        parse_response(&payload)
    }
}

#[async_trait]
impl PolicyConnection for TcpPolicyConnection {
    async fn query(
        &mut self,
        path: &str,
        query: &SExpr,
    ) -> Result<SpocpResponse, PolicyClientError> {
        self.send(&query_frame(path, &query.canonical())).await?;
        loop {
            let response = self.receive().await?;
            if !response.is_multiline() {
                return Ok(response);
            }
            tracing::trace!(text = %response.text, "skipping multi-line response");
        }
    }

    async fn logout(&mut self) -> Result<(), PolicyClientError> {
        self.send(&logout_frame()).await?;
        match self.receive().await {
            Ok(_) | Err(PolicyClientError::Closed) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
