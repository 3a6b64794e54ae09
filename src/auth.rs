//! Authentication adapters.
//!
//! An adapter contributes headers to every outgoing request. It is injected
//! when the client is built and never changes afterwards.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Supplies authentication headers for outgoing requests.
pub trait AuthAdapter: Send + Sync {
    fn headers(&self) -> BTreeMap<String, String>;
}

/// No authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthAdapter for NoAuth {
    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

fn authorization(value: String) -> BTreeMap<String, String> {
    BTreeMap::from([("Authorization".to_string(), value)])
}

/// `Authorization: Bearer <token>`, e.g. a pre-generated ZGW JWT.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl AuthAdapter for BearerToken {
    fn headers(&self) -> BTreeMap<String, String> {
        authorization(format!("Bearer {}", self.0))
    }
}

/// `Authorization: Token <key>`, as used by Django REST framework token auth.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl AuthAdapter for ApiToken {
    fn headers(&self) -> BTreeMap<String, String> {
        authorization(format!("Token {}", self.0))
    }
}

/// HTTP Basic authentication.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl AuthAdapter for BasicAuth {
    fn headers(&self) -> BTreeMap<String, String> {
        let credentials = STANDARD.encode(format!("{}:{}", self.username, self.password));
        authorization(format!("Basic {credentials}"))
    }
}

/// A fixed set of headers, for API-key style schemes.
#[derive(Clone, Default)]
pub struct StaticHeaders(BTreeMap<String, String>);

impl StaticHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl AuthAdapter for StaticHeaders {
    fn headers(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

// Credentials never show up in debug output.

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiToken").field(&"[REDACTED]").finish()
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for StaticHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}
