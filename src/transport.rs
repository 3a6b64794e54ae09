//! HTTP transport boundary.
//!
//! The client never performs I/O itself: it builds a [`TransportRequest`]
//! and hands it to a [`Transport`] verb method, then reads the returned
//! [`TransportResponse`]. Connection pooling, TLS and socket-level retries
//! belong to the transport.

use std::time::Duration;

use serde_json::Value;

use crate::error::TransportError;

/// Everything a transport needs besides method and path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportRequest {
    /// Query pairs; repeated names are sent repeatedly.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// JSON body, only set for POST, PUT and PATCH.
    pub json: Option<Value>,
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Last value of a header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Whether the status is an error status (4xx or 5xx).
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Verb methods of an HTTP session.
///
/// Paths are relative to the transport's own base URL. Implementations
/// return `Ok` for every response that arrived, whatever its status; status
/// interpretation is left to the client.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;

    fn post(&self, path: &str, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;

    fn put(&self, path: &str, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;

    fn patch(&self, path: &str, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;

    fn delete(&self, path: &str, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

#[cfg(feature = "remote")]
pub use remote::ReqwestTransport;

#[cfg(feature = "remote")]
mod remote {
    use reqwest::blocking::Client;
    use reqwest::Method;
    use url::Url;

    use super::{Transport, TransportRequest, TransportResponse};
    use crate::error::TransportError;

    /// Blocking transport backed by a shared `reqwest` client.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
        base_url: Url,
    }

    impl ReqwestTransport {
        /// Create a transport for `base_url` with a default client.
        ///
        /// # Errors
        ///
        /// Returns `TransportError::InvalidUrl` if `base_url` is not a URL.
        pub fn new(base_url: &str) -> Result<Self, TransportError> {
            Self::with_client(base_url, Client::new())
        }

        /// Create a transport reusing a configured client.
        ///
        /// # Errors
        ///
        /// Returns `TransportError::InvalidUrl` if `base_url` is not a URL.
        pub fn with_client(base_url: &str, client: Client) -> Result<Self, TransportError> {
            // A trailing slash makes relative joins append instead of replace.
            let normalized = format!("{}/", base_url.trim_end_matches('/'));
            let base_url = Url::parse(&normalized).map_err(|source| TransportError::InvalidUrl {
                url: base_url.to_string(),
                source,
            })?;
            Ok(Self { client, base_url })
        }

        pub fn base_url(&self) -> &Url {
            &self.base_url
        }

        fn send(
            &self,
            method: Method,
            path: &str,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            let url = self
                .base_url
                .join(path.trim_start_matches('/'))
                .map_err(|source| TransportError::InvalidUrl {
                    url: path.to_string(),
                    source,
                })?;
            let url_string = url.to_string();

            let mut builder = self.client.request(method, url).query(&request.query);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.json {
                builder = builder.json(body);
            }
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            let reqwest_error = |source| TransportError::Reqwest {
                url: url_string.clone(),
                source,
            };
            let response = builder.send().map_err(reqwest_error)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
                .collect();
            let body = response.text().map_err(reqwest_error)?;

            Ok(TransportResponse {
                status,
                headers,
                body,
            })
        }
    }

    impl Transport for ReqwestTransport {
        fn get(
            &self,
            path: &str,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.send(Method::GET, path, request)
        }

        fn post(
            &self,
            path: &str,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.send(Method::POST, path, request)
        }

        fn put(
            &self,
            path: &str,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.send(Method::PUT, path, request)
        }

        fn patch(
            &self,
            path: &str,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.send(Method::PATCH, path, request)
        }

        fn delete(
            &self,
            path: &str,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.send(Method::DELETE, path, request)
        }
    }
}
