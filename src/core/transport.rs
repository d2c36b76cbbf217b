// src/core/transport.rs

use std::fmt;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Boxed cause of a failed request, kept opaque so any transport can report its own errors.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Timeout applied by [`HttpTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// What a transport hands back: the status code and the fully read body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the single blocking GET behind a report fetch.
///
/// Implementations must read the whole body before returning, so the
/// underlying connection is released on every path.
pub trait Transport: Send + Sync + fmt::Debug {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// The production transport, a thin wrapper over `reqwest`'s blocking client.
///
/// The wrapped client pools connections, so share one instance across
/// lookups (see `Client::with_transport`) rather than building one per call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a transport with [`DEFAULT_TIMEOUT`].
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Builds a transport whose requests give up after `timeout`.
    ///
    /// # Arguments
    /// * `timeout` - Total deadline for connect, request and body read.
    ///
    /// # Returns
    /// The transport, or the error `reqwest` raised while building its client
    /// (for instance when the TLS backend cannot be initialised).
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client.");
                e
            })?;
        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest` client (custom proxy, TLS roots, headers).
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        // reqwest errors embed the full URL, query included; strip it so the key stays out.
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| e.without_url())?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response.");

        let body = response.text().map_err(|e| e.without_url())?;
        debug!(bytes = body.len(), "Read response body.");

        Ok(HttpResponse { status: status.as_u16(), body })
    }
}
