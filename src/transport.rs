//! Blocking access to the DSpace REST API.
//!
//! The fetchers only need one operation from the network: issue a `GET`
//! against a path under the REST root and hand back the status and body.
//! [`Transport`] is that seam; [`HttpTransport`] is the real implementation
//! over [`reqwest::blocking`].
//!
//! Interpreting the status is left to the caller, since a single-record
//! lookup and a collection page treat failures differently.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;

use crate::config::SourceConfig;
use crate::error::{ImportError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response from parts.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 200 OK, the only status the source uses for success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A way of performing `GET` requests against the source's REST root.
pub trait Transport {
    /// Issue one request for `path` (e.g. `/items/42/metadata`).
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Transport`] when no response was received.
    /// Non-success statuses are *not* errors at this level.
    fn get(&self, path: &str) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str) -> Result<HttpResponse> {
        (**self).get(path)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, path: &str) -> Result<HttpResponse> {
        (**self).get(path)
    }
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a client for the host named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| ImportError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.rest_base_url(),
        })
    }

    /// REST root every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ImportError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ImportError::Transport(e.to_string()))?;

        debug!(%url, status, bytes = body.len(), "response");
        Ok(HttpResponse { status, body })
    }
}

/// Scripted in-memory transport for unit tests.
#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::{HttpResponse, Transport};
    use crate::error::{ImportError, Result};

    /// Replays queued responses in order and records every requested path.
    /// Once the script runs out, every request fails at the transport level.
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        responses: RefCell<VecDeque<HttpResponse>>,
        requests: RefCell<Vec<String>>,
    }

    impl MockTransport {
        pub(crate) fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
            Self {
                responses: RefCell::new(responses.into_iter().collect()),
                requests: RefCell::default(),
            }
        }

        pub(crate) fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for MockTransport {
        fn get(&self, path: &str) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(path.to_string());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ImportError::Transport("script exhausted".to_string()))
        }
    }
}
