// src/core/error.rs

use crate::core::transport::TransportError;
use strum::Display;

/// Everything that can go wrong while fetching a report.
///
/// Each variant is terminal; nothing is retried inside the crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client has no API key configured. Raised before any network activity.
    #[error("Empty API key is invalid")]
    Credential,

    /// The request never produced a readable body (DNS, connect, timeout, I/O).
    #[error("failed to get {endpoint}: {source}")]
    Network {
        /// Endpoint without its query string, so the key never shows up in messages.
        endpoint: String,
        #[source]
        source: TransportError,
    },

    /// The body was not valid JSON or did not fit the report shape.
    #[error("failed to parse response: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
}

/// Payload-free view of [`ClientError`], handy for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Credential,
    Network,
    Decode,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Credential => ErrorKind::Credential,
            ClientError::Network { .. } => ErrorKind::Network,
            ClientError::Decode { .. } => ErrorKind::Decode,
        }
    }
}
