//! Schema loading from local fixtures and remote URLs.
//!
//! [`SchemaLoader`] picks a logical schema name for a service and loads the
//! matching document. Failures are logged and reported as `None`: a missing
//! schema only means operations are routed by inference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LoadError;
use crate::schema::Schema;
use crate::types::Service;

/// Default timeout for schema fetches (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable selecting the execution mode.
pub const MODE_ENV_VAR: &str = "ZGW_CLIENT_MODE";

/// Base-URL substrings mapped to schema names, most specific first.
///
/// These cover services that share a generic API type or serve a narrower
/// API than their type tag suggests.
pub const SCHEMA_URL_PATTERNS: &[(&str, &str)] = &[
    ("/klantinteracties/", "klantinteracties"),
    ("/contactmomenten/", "contactmomenten"),
    ("/klanten/", "klanten"),
    ("/verzoeken/", "verzoeken"),
    ("/objecttypen/", "objecttypen"),
    ("/objecten/", "objecten"),
    ("/autorisaties/", "ac"),
];

/// Fixture file extensions, tried in order.
const FIXTURE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Something that can produce a schema for one service.
pub trait SchemaSource {
    /// Load the schema, or `None` when none is available.
    fn load_schema(&self) -> Option<Schema>;
}

/// Where schemas come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Read local fixture files.
    Test,
    /// Fetch from the configured schema URLs.
    Production,
}

impl ExecutionMode {
    /// Read the mode from `ZGW_CLIENT_MODE`; anything but `test` is production.
    pub fn detect() -> Self {
        match std::env::var(MODE_ENV_VAR) {
            Ok(value) if value.eq_ignore_ascii_case("test") => ExecutionMode::Test,
            _ => ExecutionMode::Production,
        }
    }
}

/// Schema loading settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub mode: ExecutionMode,
    /// Directory holding `<schema name>.yaml` fixtures for test mode.
    pub fixtures_dir: PathBuf,
    /// Logical schema name to document URL, for production mode.
    pub schema_urls: BTreeMap<String, String>,
    #[serde(rename = "timeout_secs", deserialize_with = "deserialize_secs")]
    pub timeout: Duration,
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::detect(),
            fixtures_dir: PathBuf::from("schemas"),
            schema_urls: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LoaderConfig {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    pub fn schema_url(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.schema_urls.insert(name.into(), url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read settings from a JSON or YAML file (by extension).
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the file is missing or unparsable.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = read_file(path)?;
        if is_yaml_source(&path.to_string_lossy()) {
            serde_yaml::from_str(&content).map_err(|source| LoadError::InvalidYaml { source })
        } else {
            serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
        }
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether a file name or URL points at a YAML document.
fn is_yaml_source(source: &str) -> bool {
    let path = source.split(['?', '#']).next().unwrap_or_default();
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

/// Parse a document as JSON or YAML.
fn parse_document(content: &str, yaml: bool) -> Result<Schema, LoadError> {
    let value: Value = if yaml {
        // Via serde_yaml::Value so non-string keys (`200:`) become strings.
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })?;
        serde_json::to_value(document).map_err(|source| LoadError::InvalidJson { source })?
    } else {
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?
    };
    Ok(Schema::new(value))
}

/// Load a schema from a file path. `.yaml`/`.yml` files are parsed as YAML,
/// everything else as JSON.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or a parse error if the content is invalid.
pub fn load_schema_file(path: &Path) -> Result<Schema, LoadError> {
    let content = read_file(path)?;
    parse_document(&content, is_yaml_source(&path.to_string_lossy()))
}

/// Load a schema from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Schema, LoadError> {
    parse_document(content, false)
}

/// Load a schema from an HTTP/HTTPS URL, parsing YAML or JSON by extension.
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or returns an
/// error status, or a parse error if the body is invalid.
#[cfg(feature = "remote")]
pub fn load_schema_url(url: &str, timeout: Duration) -> Result<Schema, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(network_error)?;

    let body = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::text)
        .map_err(network_error)?;

    parse_document(&body, is_yaml_source(url))
}

#[cfg(not(feature = "remote"))]
pub fn load_schema_url(url: &str, _timeout: Duration) -> Result<Schema, LoadError> {
    Err(LoadError::RemoteDisabled {
        url: url.to_string(),
    })
}

/// Resolve the logical schema name for a service.
///
/// URL patterns are checked first, then the API type. A generic service
/// with no matching pattern has no schema.
pub fn resolve_schema_name(service: &Service) -> Option<String> {
    SCHEMA_URL_PATTERNS
        .iter()
        .find(|(pattern, _)| service.api_root.contains(pattern))
        .map(|(_, name)| (*name).to_string())
        .or_else(|| service.api_type.schema_name().map(str::to_string))
}

/// Loads the schema of one bound service.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    service: Option<Service>,
    config: LoaderConfig,
}

impl SchemaLoader {
    pub fn new(service: Option<Service>, config: LoaderConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the schema, returning the error instead of logging it.
    ///
    /// `Ok(None)` means no schema applies (no service bound, or a generic
    /// service with no known name).
    pub fn try_load(&self) -> Result<Option<Schema>, LoadError> {
        match self.schema_name() {
            Some(name) => self.load_named(&name).map(Some),
            None => Ok(None),
        }
    }

    /// Logical schema name of the bound service, if any.
    pub fn schema_name(&self) -> Option<String> {
        let service = self.service.as_ref()?;
        let name = resolve_schema_name(service);
        if name.is_none() {
            tracing::debug!(base_url = %service.api_root, "no schema name for service");
        }
        name
    }

    fn base_url(&self) -> &str {
        self.service.as_ref().map_or("", |s| s.api_root.as_str())
    }

    fn load_named(&self, name: &str) -> Result<Schema, LoadError> {
        let schema = match self.config.mode {
            ExecutionMode::Test => self.load_fixture(name)?,
            ExecutionMode::Production => {
                let url = self
                    .config
                    .schema_urls
                    .get(name)
                    .ok_or_else(|| LoadError::UnmappedSchema {
                        name: name.to_string(),
                    })?;
                load_schema_url(url, self.config.timeout)?
            }
        };

        tracing::debug!(
            base_url = %self.base_url(),
            schema = %name,
            mode = ?self.config.mode,
            "schema loaded"
        );
        Ok(schema)
    }

    fn load_fixture(&self, name: &str) -> Result<Schema, LoadError> {
        FIXTURE_EXTENSIONS
            .iter()
            .map(|ext| self.config.fixtures_dir.join(format!("{name}.{ext}")))
            .find(|path| path.exists())
            .ok_or_else(|| LoadError::MissingFixture {
                name: name.to_string(),
                dir: self.config.fixtures_dir.clone(),
            })
            .and_then(|path| load_schema_file(&path))
    }
}

impl SchemaSource for SchemaLoader {
    fn load_schema(&self) -> Option<Schema> {
        let name = self.schema_name()?;
        match self.load_named(&name) {
            Ok(schema) => Some(schema),
            Err(error) => {
                tracing::warn!(
                    base_url = %self.base_url(),
                    schema = %name,
                    %error,
                    "failed to load schema, falling back to inference"
                );
                None
            }
        }
    }
}
