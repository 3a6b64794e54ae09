//! Error types for operation routing, schema loading and HTTP calls.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Uniform error returned by every client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a 4xx or 5xx status.
    ///
    /// `body` holds the response body when it parsed as JSON.
    #[error("HTTP {status} response")]
    Http {
        status: u16,
        body: Option<Value>,
        #[source]
        source: TransportError,
    },

    /// The operation id matched neither a schema entry nor the naming convention.
    #[error("unresolvable operation \"{operation_id}\"")]
    UnresolvableOperation { operation_id: String },

    #[error("unsupported HTTP method \"{method}\"")]
    UnsupportedMethod { method: String },

    /// No response was received (connection refused, timeout, ...).
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("response body is not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode request body: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Parsed error body of an HTTP failure, if there was one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// HTTP status of an HTTP failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for resolution and method errors, which indicate a caller bug
    /// rather than a remote failure.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableOperation { .. } | Self::UnsupportedMethod { .. }
        )
    }
}

/// Errors raised at the transport boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A response arrived with an error status.
    #[error("{method} {path} returned status {status}")]
    Status {
        method: String,
        path: String,
        status: u16,
    },

    #[cfg(feature = "remote")]
    #[error("request to {url} failed: {source}")]
    Reqwest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Failure reported by a caller-provided transport.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors while loading a schema document.
///
/// The schema loader logs these and falls back to inference; they only
/// surface from the standalone loading functions.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("remote schema loading is disabled, cannot fetch {url}")]
    RemoteDisabled { url: String },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no schema URL configured for \"{name}\"")]
    UnmappedSchema { name: String },

    #[error("no fixture for schema \"{name}\" in {dir}")]
    MissingFixture { name: String, dir: PathBuf },
}
