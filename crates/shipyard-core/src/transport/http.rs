//! HTTP transport backed by a blocking reqwest client

use std::time::Duration;

use reqwest::blocking::Client;

use super::{HttpTransport, TransportError};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Errors from the HTTP transport
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Plain GET with a bounded timeout. No retries.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        if timeout.is_zero() {
            return Err(HttpError::ZeroTimeout);
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("shipyard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HttpError::Client)?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let request_err = |source| HttpError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.bytes().map_err(request_err)?;
        tracing::debug!(%url, bytes = body.len(), "HTTP fetch complete");
        Ok(body.to_vec())
    }
}
