//! Response status handling and body parsing.

use serde_json::{Map, Value};

use crate::error::{ClientError, TransportError};
use crate::transport::TransportResponse;

/// Turn 4xx/5xx responses into `ClientError::Http`.
///
/// The body is parsed as JSON when possible; a non-JSON body leaves
/// `body` empty. `method` and `path` identify the request in the chained
/// status error.
///
/// # Errors
///
/// Returns `ClientError::Http` for any status >= 400.
pub fn handle_response(
    response: &TransportResponse,
    method: &str,
    path: &str,
) -> Result<(), ClientError> {
    if !response.is_error() {
        return Ok(());
    }

    let body = serde_json::from_str(&response.body).ok();
    tracing::debug!(status = response.status, method, path, "error response");
    Err(ClientError::Http {
        status: response.status,
        body,
        source: TransportError::Status {
            method: method.to_string(),
            path: path.to_string(),
            status: response.status,
        },
    })
}

/// Parse a successful response body; empty bodies yield `{}`.
///
/// # Errors
///
/// Returns `ClientError::InvalidJson` if a non-empty body isn't JSON.
pub fn parse_body(response: &TransportResponse) -> Result<Value, ClientError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(&response.body).map_err(|source| ClientError::InvalidJson { source })
}
