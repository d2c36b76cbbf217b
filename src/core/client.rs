// src/core/client.rs

use serde::de::Error as _;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::core::error::ClientError;
use crate::core::models::Report;
use crate::core::transport::{HttpTransport, Transport};

/// Public endpoint published by the service.
pub const DEFAULT_URL: &str = "https://www.virustotal.com/vtapi/v2/";

/// Environment variable read by [`Client::from_env`].
pub const API_KEY_ENV: &str = "VT_API_KEY";

const REPORT_PATH: &str = "file/report";

/// Addresses and authenticates requests to the report service.
///
/// `url` must end in `/`: endpoint paths are appended to it verbatim.
#[derive(Debug, Clone, Default)]
pub struct Client {
    /// Private API key. Empty is allowed here but rejected by every fetch.
    pub apikey: String,
    /// Service base URL, e.g. [`DEFAULT_URL`].
    pub url: String,
    /// Set explicitly, or filled with a default `HttpTransport` on first fetch.
    transport: OnceLock<Arc<dyn Transport>>,
}

impl Client {
    pub fn new(apikey: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            apikey: apikey.into(),
            url: url.into(),
            transport: OnceLock::new(),
        }
    }

    /// Creates a client for the public endpoint.
    pub fn with_default_url(apikey: impl Into<String>) -> Self {
        Self::new(apikey, DEFAULT_URL)
    }

    /// Creates a client for the public endpoint with the key taken from `VT_API_KEY`.
    ///
    /// A missing variable yields an empty key; the error surfaces on the first fetch.
    pub fn from_env() -> Self {
        let apikey = std::env::var(API_KEY_ENV).unwrap_or_default();
        if apikey.is_empty() {
            debug!(var = API_KEY_ENV, "API key variable is unset or empty.");
        }
        Self::with_default_url(apikey)
    }

    /// Replaces the transport used by [`Client::get_report`].
    ///
    /// Without one, the first fetch builds an [`HttpTransport`] that later
    /// fetches and clones of this client reuse.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = OnceLock::from(transport);
        self
    }

    fn transport(&self, endpoint: &str) -> Result<Arc<dyn Transport>, ClientError> {
        if let Some(transport) = self.transport.get() {
            return Ok(Arc::clone(transport));
        }
        let built: Arc<dyn Transport> =
            Arc::new(HttpTransport::new().map_err(|source| ClientError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?);
        // A concurrent first fetch may have won the race; use whichever got stored.
        Ok(Arc::clone(self.transport.get_or_init(|| built)))
    }

    /// Points the client at [`DEFAULT_URL`].
    pub fn use_default_url(&mut self) {
        self.url = DEFAULT_URL.to_string();
    }

    /// Ensures an API key is configured.
    pub fn check_api_key(&self) -> Result<(), ClientError> {
        if self.apikey.is_empty() {
            Err(ClientError::Credential)
        } else {
            Ok(())
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.url, REPORT_PATH)
    }

    /// Builds the full report URL for `resource`.
    ///
    /// # Arguments
    /// * `resource` - MD5, SHA1 or SHA256 of the file. Not validated locally.
    ///
    /// # Returns
    /// `<url>file/report?apikey=<key>&resource=<resource>` with both values
    /// form-encoded, or a `Network` error when the base URL does not parse.
    pub fn report_url(&self, resource: &str) -> Result<Url, ClientError> {
        let endpoint = self.endpoint();
        Url::parse_with_params(
            &endpoint,
            &[("apikey", self.apikey.as_str()), ("resource", resource)],
        )
        .map_err(|e| ClientError::Network {
            endpoint,
            source: Box::new(e),
        })
    }

    /// Fetches the scan report for a file hash.
    ///
    /// The steps are validate key, build URL, GET, decode. The first failure
    /// ends the call; a `Credential` failure happens before any network activity.
    /// The HTTP status is not interpreted: whatever body came back is decoded,
    /// so an empty rate-limit reply surfaces as a `Decode` error.
    ///
    /// # Arguments
    /// * `resource` - MD5, SHA1 or SHA256 of the file, forwarded unchanged.
    ///
    /// # Returns
    /// The decoded `Report`, or the `ClientError` of the step that failed.
    ///
    /// # Panics
    /// The default [`HttpTransport`] uses `reqwest`'s blocking client, which
    /// panics when called from inside an async (tokio) runtime. Call this from
    /// a plain thread, e.g. via `tokio::task::spawn_blocking`.
    pub fn get_report(&self, resource: &str) -> Result<Report, ClientError> {
        if let Err(err) = self.check_api_key() {
            warn!(error = %err, "Invalid API key.");
            return Err(err);
        }

        let endpoint = self.endpoint();
        let url = self.report_url(resource).inspect_err(|err| {
            error!(error = %err, "Could not build report URL.");
        })?;

        let transport = self.transport(&endpoint)?;

        debug!(endpoint = %endpoint, resource, "Requesting file report.");
        let response = transport.get(&url).map_err(|source| {
            error!(endpoint = %endpoint, error = %source, "Failed to get file report.");
            ClientError::Network {
                endpoint: endpoint.clone(),
                source,
            }
        })?;

        if !response.is_success() {
            warn!(status = response.status, "Non-success HTTP status, decoding body anyway.");
        }

        let report = decode_report(&response.body).map_err(|e| {
            error!(error = %e, "Failed to parse response.");
            ClientError::from(e)
        })?;

        info!(
            resource,
            response_code = report.response_code,
            positives = report.positives,
            total = report.total,
            "File report fetched."
        );
        Ok(report)
    }
}

/// Decodes the first JSON value in `body`.
///
/// Anything after that value is ignored, and a top-level `null` yields the
/// zero-valued report. An empty body is an error.
fn decode_report(body: &str) -> Result<Report, serde_json::Error> {
    serde_json::Deserializer::from_str(body)
        .into_iter::<Option<Report>>()
        .next()
        .unwrap_or_else(|| Err(serde_json::Error::custom("empty response body")))
        .map(Option::unwrap_or_default)
}
