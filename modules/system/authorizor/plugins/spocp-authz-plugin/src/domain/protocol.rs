//! SPOCP wire framing.
//!
//! Every message is `<len>:<payload>` where `<len>` is the decimal byte
//! length of the payload. Payloads are themselves sequences of
//! length-prefixed elements:
//!
//! - query: `5:QUERY<len>:<path><len>:<canonical-query>`
//! - logout: `6:LOGOUT`
//! - response: `<len>:<code><len>:<text>`

use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::PolicyClientError;

/// Success.
pub const CODE_OK: &str = "200";
/// One line of a multi-line answer; more responses follow.
pub const CODE_MULTILINE: &str = "201";

/// Largest frame accepted from the server.
const MAX_FRAME_LEN: usize = 64 * 1024;
/// Longest decimal length prefix accepted.
const MAX_LEN_DIGITS: usize = 10;

/// One decoded server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpocpResponse {
    pub code: String,
    pub text: String,
}

impl SpocpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == CODE_OK
    }

    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.code == CODE_MULTILINE
    }
}

/// Append one length-prefixed element.
pub fn push_element(out: &mut Vec<u8>, element: &[u8]) {
    out.extend_from_slice(element.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(element);
}

/// Wrap a payload into a frame.
#[must_use]
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    push_element(&mut out, payload);
    out
}

#[must_use]
pub fn query_frame(path: &str, canonical_query: &str) -> Vec<u8> {
    let mut payload = Vec::new();
    push_element(&mut payload, b"QUERY");
    push_element(&mut payload, path.as_bytes());
    push_element(&mut payload, canonical_query.as_bytes());
    frame(&payload)
}

#[must_use]
pub fn logout_frame() -> Vec<u8> {
    let mut payload = Vec::new();
    push_element(&mut payload, b"LOGOUT");
    frame(&payload)
}

/// Read one frame from the stream and return its payload.
///
/// # Errors
///
/// Returns [`PolicyClientError::Closed`] on EOF before the first byte,
/// [`PolicyClientError::Protocol`] for malformed framing.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, PolicyClientError>
where
    R: AsyncRead + Unpin,
{
    let mut digits = String::new();
    loop {
        let byte = match reader.read_u8().await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof && digits.is_empty() => {
                return Err(PolicyClientError::Closed);
            }
            Err(e) => return Err(e.into()),
        };
        match byte {
            b':' => break,
            b'0'..=b'9' if digits.len() < MAX_LEN_DIGITS => digits.push(char::from(byte)),
            _ => {
                return Err(PolicyClientError::Protocol(format!(
                    "invalid length prefix byte 0x{byte:02x}"
                )));
            }
        }
    }

    let len: usize = digits
        .parse()
        .map_err(|_| PolicyClientError::Protocol("empty length prefix".to_owned()))?;
    if len > MAX_FRAME_LEN {
        return Err(PolicyClientError::Protocol(format!(
            "frame of {len} bytes exceeds limit"
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Split a payload into its length-prefixed elements.
///
/// # Errors
///
/// Returns [`PolicyClientError::Protocol`] if an element is truncated or its
/// prefix is not a decimal length.
pub fn parse_elements(mut payload: &[u8]) -> Result<Vec<Vec<u8>>, PolicyClientError> {
    let mut elements = Vec::new();
    while !payload.is_empty() {
        let colon = payload
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| PolicyClientError::Protocol("missing element length".to_owned()))?;
        let len: usize = std::str::from_utf8(&payload[..colon])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PolicyClientError::Protocol("invalid element length".to_owned()))?;
        let rest = &payload[colon + 1..];
        if rest.len() < len {
            return Err(PolicyClientError::Protocol("truncated element".to_owned()));
        }
        elements.push(rest[..len].to_vec());
        payload = &rest[len..];
    }
    Ok(elements)
}

/// Decode a response payload.
///
/// # Errors
///
/// Returns [`PolicyClientError::Protocol`] if the payload has no code element.
pub fn parse_response(payload: &[u8]) -> Result<SpocpResponse, PolicyClientError> {
    let mut elements = parse_elements(payload)?.into_iter();
    let code = elements
        .next()
        .ok_or_else(|| PolicyClientError::Protocol("empty response".to_owned()))?;
    let text: Vec<String> = elements
        .map(|e| String::from_utf8_lossy(&e).into_owned())
        .collect();
    Ok(SpocpResponse {
        code: String::from_utf8_lossy(&code).into_owned(),
        text: text.join(" "),
    })
}
