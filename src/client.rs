//! Client composition root.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::auth::{AuthAdapter, NoAuth};
use crate::crud::{PartialUpdate, ResourceCrud, ResourceRef};
use crate::error::ClientError;
use crate::executor::{OperationExecutor, RequestOptions};
use crate::loader::{LoaderConfig, SchemaLoader};
use crate::normalize::UrlNormalizer;
use crate::pluralize::Pluralizer;
use crate::registry::SchemaRegistry;
use crate::resolver::{OperationResolver, ResolvedOperation};
use crate::schema::Schema;
use crate::transport::Transport;
use crate::types::{PathParams, QueryParams, Service};

/// Builder for [`Client`].
pub struct ClientBuilder {
    base_url: String,
    transport: Option<Arc<dyn Transport>>,
    auth: Arc<dyn AuthAdapter>,
    service: Option<Service>,
    loader_config: Option<LoaderConfig>,
    registry: Option<Arc<SchemaRegistry>>,
    pluralizer: Pluralizer,
}

impl ClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: None,
            auth: Arc::new(NoAuth),
            service: None,
            loader_config: None,
            registry: None,
            pluralizer: Pluralizer::default(),
        }
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn auth(mut self, auth: impl AuthAdapter + 'static) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// Bind a service descriptor, enabling schema loading.
    pub fn service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    pub fn loader_config(mut self, config: LoaderConfig) -> Self {
        self.loader_config = Some(config);
        self
    }

    /// Use a dedicated schema cache instead of the process-wide one.
    pub fn registry(mut self, registry: Arc<SchemaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn pluralizer(mut self, pluralizer: Pluralizer) -> Self {
        self.pluralizer = pluralizer;
        self
    }

    /// Build the client.
    ///
    /// Without an explicit transport, a `ReqwestTransport` for the base URL
    /// is used (requires the `remote` feature).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if no transport is available or the
    /// base URL is invalid.
    pub fn build(self) -> Result<Client, ClientError> {
        let transport = match self.transport.clone() {
            Some(transport) => transport,
            None => default_transport(&self.base_url)?,
        };
        Ok(self.assemble(transport))
    }

    fn assemble(self, transport: Arc<dyn Transport>) -> Client {
        let loader = SchemaLoader::new(self.service, self.loader_config.unwrap_or_default());

        Client {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            transport,
            auth: self.auth,
            loader,
            registry: self.registry.unwrap_or_else(SchemaRegistry::global),
            pluralizer: self.pluralizer,
            crud: OnceLock::new(),
        }
    }
}

#[cfg(feature = "remote")]
fn default_transport(base_url: &str) -> Result<Arc<dyn Transport>, ClientError> {
    Ok(Arc::new(crate::transport::ReqwestTransport::new(base_url)?))
}

#[cfg(not(feature = "remote"))]
fn default_transport(_base_url: &str) -> Result<Arc<dyn Transport>, ClientError> {
    Err(ClientError::Transport(crate::error::TransportError::Other(
        "no transport configured and the `remote` feature is disabled".into(),
    )))
}

/// Client for one backing service.
///
/// The schema is looked up on first use and kept for the client's lifetime.
pub struct Client {
    base_url: String,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthAdapter>,
    loader: SchemaLoader,
    registry: Arc<SchemaRegistry>,
    pluralizer: Pluralizer,
    crud: OnceLock<ResourceCrud>,
}

impl Client {
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// A client without service binding or authentication.
    pub fn new(base_url: impl Into<String>, transport: impl Transport + 'static) -> Self {
        ClientBuilder::new(base_url).assemble(Arc::new(transport))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn service(&self) -> Option<&Service> {
        self.loader.service()
    }

    fn crud(&self) -> &ResourceCrud {
        self.crud.get_or_init(|| {
            // An unbound client never touches the registry, so it can't cache
            // an empty entry for a base URL that a bound client also uses.
            let schema = match self.loader.service() {
                Some(_) => self.registry.get_schema(&self.base_url, &self.loader),
                None => None,
            };
            ResourceCrud::new(
                OperationResolver::new(schema).with_pluralizer(self.pluralizer.clone()),
                OperationExecutor::new(Arc::clone(&self.transport), Arc::clone(&self.auth)),
                UrlNormalizer::new(&self.base_url),
            )
        })
    }

    /// The schema routing this client's operations, if any.
    pub fn schema(&self) -> Option<Arc<Schema>> {
        self.crud().resolver().schema().cloned()
    }

    /// Drop the cached schema so the next call loads it again.
    pub fn clear_schema_cache(&mut self) {
        self.registry.clear_cache(Some(&self.base_url));
        self.crud = OnceLock::new();
    }

    pub fn normalizer(&self) -> &UrlNormalizer {
        self.crud().normalizer()
    }

    /// Resolve an operation id without executing it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnresolvableOperation` if no route exists.
    pub fn resolve_operation(
        &self,
        operation_id: &str,
        params: &PathParams,
    ) -> Result<ResolvedOperation, ClientError> {
        self.crud().resolver().resolve_operation(operation_id, params)
    }

    pub fn supports_operation(&self, operation_id: &str) -> bool {
        self.crud().resolver().supports_operation(operation_id)
    }

    /// Execute an operation by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn operation(
        &self,
        operation_id: &str,
        params: &PathParams,
        options: RequestOptions,
    ) -> Result<Value, ClientError> {
        self.crud().operation(operation_id, params, options)
    }

    /// See [`ResourceCrud::list`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn list(&self, resource: &str, query: Option<&QueryParams>) -> Result<Value, ClientError> {
        self.crud().list(resource, query)
    }

    /// See [`ResourceCrud::retrieve`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn retrieve(&self, resource: &str, target: &ResourceRef) -> Result<Value, ClientError> {
        self.crud().retrieve(resource, target)
    }

    /// See [`ResourceCrud::create`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn create(&self, resource: &str, data: &Value) -> Result<Value, ClientError> {
        self.crud().create(resource, data)
    }

    /// See [`ResourceCrud::update`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn update(
        &self,
        resource: &str,
        data: &Value,
        target: &ResourceRef,
    ) -> Result<Value, ClientError> {
        self.crud().update(resource, data, target)
    }

    /// See [`ResourceCrud::partial_update`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on HTTP failure.
    pub fn partial_update(
        &self,
        resource: &str,
        update: PartialUpdate,
    ) -> Result<Value, ClientError> {
        self.crud().partial_update(resource, update)
    }

    /// See [`ResourceCrud::delete`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn delete(&self, resource: &str, target: Option<&ResourceRef>) -> Result<(), ClientError> {
        self.crud().delete(resource, target)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("service", &self.loader.service())
            .finish_non_exhaustive()
    }
}
