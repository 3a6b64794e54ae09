//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use zgw_client::{Transport, TransportError, TransportRequest, TransportResponse};

/// One request seen by [`RecordingTransport`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub request: TransportRequest,
}

#[derive(Default)]
struct Inner {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<Recorded>>,
}

/// Transport that records requests and replays queued responses.
///
/// With an empty queue every request gets `200 {}`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Inner>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(TransportResponse::new(status, body));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.inner.requests.lock().unwrap().push(Recorded {
            method,
            path: path.to_string(),
            request,
        });
        let next = self.inner.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| TransportResponse::new(200, "{}")))
    }
}

impl Transport for RecordingTransport {
    fn get(&self, path: &str, r: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.record("GET", path, r)
    }

    fn post(&self, path: &str, r: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.record("POST", path, r)
    }

    fn put(&self, path: &str, r: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.record("PUT", path, r)
    }

    fn patch(&self, path: &str, r: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.record("PATCH", path, r)
    }

    fn delete(&self, path: &str, r: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.record("DELETE", path, r)
    }
}

/// Directory with the OAS fixtures used in test mode.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}
