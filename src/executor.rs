//! Request execution for resolved operations.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::auth::AuthAdapter;
use crate::error::ClientError;
use crate::response::{handle_response, parse_body};
use crate::transport::{Transport, TransportRequest};
use crate::types::{query_pairs, HttpMethod, QueryParams, QueryValue};

/// Per-request inputs merged into one transport request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// JSON body, ignored for GET and DELETE.
    pub data: Option<Value>,
    pub params: QueryParams,
    /// Extra headers; these override authentication headers.
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params.extend(params);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Issues HTTP calls through a transport.
#[derive(Clone)]
pub struct OperationExecutor {
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthAdapter>,
}

impl OperationExecutor {
    pub fn new(transport: Arc<dyn Transport>, auth: Arc<dyn AuthAdapter>) -> Self {
        Self { transport, auth }
    }

    /// Execute `method` on `path` and return the parsed response body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnsupportedMethod` before any I/O for methods
    /// other than GET, POST, PUT, PATCH and DELETE, `ClientError::Http` for
    /// error statuses and `ClientError::Transport` when no response arrived.
    pub fn execute(
        &self,
        method: &str,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ClientError> {
        let method = HttpMethod::parse(method).ok_or_else(|| ClientError::UnsupportedMethod {
            method: method.to_string(),
        })?;
        let request = self.build_request(method, options);

        tracing::debug!(%method, path, "sending request");
        let response = match method {
            HttpMethod::Get => self.transport.get(path, request),
            HttpMethod::Post => self.transport.post(path, request),
            HttpMethod::Put => self.transport.put(path, request),
            HttpMethod::Patch => self.transport.patch(path, request),
            HttpMethod::Delete => self.transport.delete(path, request),
        }?;
        tracing::debug!(%method, path, status = response.status, "received response");

        handle_response(&response, method.as_str(), path)?;
        parse_body(&response)
    }

    fn build_request(&self, method: HttpMethod, options: RequestOptions) -> TransportRequest {
        let mut headers = self.auth.headers();
        // Caller headers replace auth headers regardless of name casing.
        for (name, value) in options.headers {
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            headers.insert(name, value);
        }

        TransportRequest {
            query: query_pairs(&options.params),
            headers: headers.into_iter().collect(),
            json: options.data.filter(|_| method.has_body()),
            timeout: options.timeout,
        }
    }
}

impl std::fmt::Debug for OperationExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationExecutor").finish_non_exhaustive()
    }
}
