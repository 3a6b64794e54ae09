//! Core value types shared by the resolver, executor and CRUD façade.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP methods the executor can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse a method name, case-insensitively.
    ///
    /// Returns `None` for methods the executor does not dispatch
    /// (HEAD, OPTIONS, TRACE, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a JSON body is sent with this method.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action suffixes recognised in `{resource}_{action}` operation ids.
///
/// Ordered so the longest suffix is tried first: `partial_update` must win
/// over `update`.
pub const ACTION_SUFFIXES: &[Action] = &[
    Action::PartialUpdate,
    Action::Retrieve,
    Action::Create,
    Action::Update,
    Action::Delete,
    Action::List,
    Action::Read,
];

/// CRUD action encoded in an operation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Read,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Delete,
}

impl Action {
    pub fn suffix(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Read => "read",
            Action::Retrieve => "retrieve",
            Action::Create => "create",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Delete => "delete",
        }
    }

    /// HTTP method used by the inferred route.
    pub fn method(&self) -> HttpMethod {
        match self {
            Action::List | Action::Read | Action::Retrieve => HttpMethod::Get,
            Action::Create => HttpMethod::Post,
            Action::Update => HttpMethod::Put,
            Action::PartialUpdate => HttpMethod::Patch,
            Action::Delete => HttpMethod::Delete,
        }
    }

    /// Whether the inferred route addresses a single item (`{plural}/{uuid}`).
    pub fn is_item(&self) -> bool {
        !matches!(self, Action::List | Action::Create)
    }
}

/// API type tag of a registered service.
///
/// Standard ZGW registries map directly to a schema name; `Orc` is the
/// generic "other" type and only resolves through URL patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    Ac,
    Brc,
    Cmc,
    Drc,
    Kc,
    Nrc,
    Vrc,
    Zrc,
    Ztc,
    Orc,
}

impl ApiType {
    /// Schema name for standard registries, `None` for generic services.
    pub fn schema_name(&self) -> Option<&'static str> {
        match self {
            ApiType::Ac => Some("ac"),
            ApiType::Brc => Some("brc"),
            ApiType::Cmc => Some("cmc"),
            ApiType::Drc => Some("drc"),
            ApiType::Kc => Some("kc"),
            ApiType::Nrc => Some("nrc"),
            ApiType::Vrc => Some("vrc"),
            ApiType::Zrc => Some("zrc"),
            ApiType::Ztc => Some("ztc"),
            ApiType::Orc => None,
        }
    }
}

/// Descriptor of the backing service a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub api_type: ApiType,
    /// The service's own API root, matched against schema URL patterns.
    pub api_root: String,
}

impl Service {
    pub fn new(api_type: ApiType, api_root: impl Into<String>) -> Self {
        Self {
            api_type,
            api_root: api_root.into(),
        }
    }
}

/// Values substituted into `{name}` placeholders of a path template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the common `{uuid}` parameter.
    pub fn uuid(uuid: impl Into<String>) -> Self {
        Self::new().with("uuid", uuid)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PathParams {
    fn from(pairs: [(K, V); N]) -> Self {
        let mut params = PathParams::new();
        for (k, v) in pairs {
            params.insert(k, v);
        }
        params
    }
}

/// A query parameter value: single-valued keys are flattened to scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// All values, in order.
    pub fn values(&self) -> &[String] {
        match self {
            QueryValue::Single(v) => std::slice::from_ref(v),
            QueryValue::Multi(vs) => vs,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

/// Query parameters keyed by name.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// Flatten query parameters into `(name, value)` pairs, repeating multi-valued keys.
pub fn query_pairs(params: &QueryParams) -> Vec<(String, String)> {
    params
        .iter()
        .flat_map(|(k, v)| v.values().iter().map(move |value| (k.clone(), value.clone())))
        .collect()
}

/// A `(operation_id, path_template, method)` triple found in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation_id: String,
    pub path_template: String,
    /// Uppercased method name as written in the schema.
    pub method: String,
}
