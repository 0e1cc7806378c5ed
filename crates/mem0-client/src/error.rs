//! Client error type.

/// Error returned by every [`MemoryClient`](crate::MemoryClient) operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Bad client configuration. Raised before any request is sent.
    #[error("configuration error: {0}")]
    Config(String),
    /// A required argument was empty. Raised before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Network, DNS, TLS or timeout failure, or a request reqwest refused to build.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    /// Non-success status. `body` is the raw response text.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },
    /// Response body was not the expected JSON.
    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The ping handshake did not report `"ok"`.
    #[error("API key is invalid (ping status: {0:?})")]
    InvalidApiKey(String),
}

impl ClientError {
    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for errors raised locally before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Config(_) | ClientError::InvalidArgument(_) | ClientError::Encode(_)
        )
    }
}
