//! Resource-level CRUD façade.
//!
//! Each method issues exactly one request. Item routes come from, in order:
//! an explicit URL, the resolver (schema or inference), and for partial
//! updates a naive `{resource}/{uuid}` path. A resolved path that still has
//! an unfilled `{placeholder}` is never sent.

use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::executor::{OperationExecutor, RequestOptions};
use crate::normalize::{join_path, UrlNormalizer};
use crate::resolver::{OperationResolver, Resolution, ResolvedOperation};
use crate::types::{Action, HttpMethod, PathParams, QueryParams};

/// How a single resource is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// Full URL or relative path, normalized against the base URL.
    Url(String),
    /// Value for the `{uuid}` placeholder.
    Uuid(String),
    /// Arbitrary path parameters, for nested routes.
    Params(PathParams),
}

impl ResourceRef {
    pub fn url(url: impl Into<String>) -> Self {
        ResourceRef::Url(url.into())
    }

    pub fn uuid(uuid: impl Into<String>) -> Self {
        ResourceRef::Uuid(uuid.into())
    }

    pub fn params(params: impl Into<PathParams>) -> Self {
        ResourceRef::Params(params.into())
    }

    fn path_params(&self) -> PathParams {
        match self {
            ResourceRef::Url(_) => PathParams::new(),
            ResourceRef::Uuid(uuid) => PathParams::uuid(uuid.as_str()),
            ResourceRef::Params(params) => params.clone(),
        }
    }
}

/// Arguments of a partial update.
///
/// Fields set with [`field`](Self::field) are merged over `data` and win on
/// key collisions.
#[derive(Debug, Clone, Default)]
pub struct PartialUpdate {
    data: Option<Value>,
    target: Option<ResourceRef>,
    parent: Option<(String, String)>,
    fields: Map<String, Value>,
}

impl PartialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn url(self, url: impl Into<String>) -> Self {
        self.target(ResourceRef::url(url))
    }

    pub fn uuid(self, uuid: impl Into<String>) -> Self {
        self.target(ResourceRef::uuid(uuid))
    }

    pub fn target(mut self, target: ResourceRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Nest the resource one level below `parent` (e.g. `zaak`) with id `uuid`.
    ///
    /// Schema routes get `{<parent>_uuid}` filled in; inferred routes are
    /// prefixed with `<parents>/<uuid>/`.
    pub fn parent(mut self, parent: impl Into<String>, uuid: impl Into<String>) -> Self {
        self.parent = Some((parent.into(), uuid.into()));
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    fn body(&self) -> Value {
        match &self.data {
            Some(Value::Object(data)) => {
                let mut body = data.clone();
                body.extend(self.fields.clone());
                Value::Object(body)
            }
            Some(other) if self.fields.is_empty() => other.clone(),
            _ => Value::Object(self.fields.clone()),
        }
    }
}

/// Whether `path` still contains a `{name}` placeholder.
fn has_placeholder(path: &str) -> bool {
    path.find('{').is_some_and(|open| path[open..].contains('}'))
}

fn filled(operation_id: &str, op: ResolvedOperation) -> Result<ResolvedOperation, ClientError> {
    if has_placeholder(&op.path) {
        tracing::debug!(operation_id, path = %op.path, "missing path parameters");
        return Err(ClientError::UnresolvableOperation {
            operation_id: operation_id.to_string(),
        });
    }
    Ok(op)
}

/// CRUD operations on named resources.
#[derive(Debug, Clone)]
pub struct ResourceCrud {
    resolver: OperationResolver,
    executor: OperationExecutor,
    normalizer: UrlNormalizer,
}

impl ResourceCrud {
    pub fn new(
        resolver: OperationResolver,
        executor: OperationExecutor,
        normalizer: UrlNormalizer,
    ) -> Self {
        Self {
            resolver,
            executor,
            normalizer,
        }
    }

    pub fn resolver(&self) -> &OperationResolver {
        &self.resolver
    }

    pub fn executor(&self) -> &OperationExecutor {
        &self.executor
    }

    pub fn normalizer(&self) -> &UrlNormalizer {
        &self.normalizer
    }

    fn resolve(
        &self,
        resource: &str,
        action: Action,
        params: &PathParams,
    ) -> Result<ResolvedOperation, ClientError> {
        let operation_id = format!("{resource}_{}", action.suffix());
        let op = self.resolver.resolve_operation(&operation_id, params)?;
        filled(&operation_id, op)
    }

    /// Path and query for an item route.
    fn route(
        &self,
        resource: &str,
        action: Action,
        target: &ResourceRef,
    ) -> Result<(String, QueryParams), ClientError> {
        match target {
            ResourceRef::Url(url) => Ok(self.normalizer.extract_query_params(url)),
            _ => {
                let op = self.resolve(resource, action, &target.path_params())?;
                Ok((op.path, QueryParams::new()))
            }
        }
    }

    /// Execute an operation by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the operation can't be resolved, a path
    /// parameter is missing, or the call fails.
    pub fn operation(
        &self,
        operation_id: &str,
        params: &PathParams,
        options: RequestOptions,
    ) -> Result<Value, ClientError> {
        let op = filled(
            operation_id,
            self.resolver.resolve_operation(operation_id, params)?,
        )?;
        self.executor.execute(&op.method, &op.path, options)
    }

    /// GET the collection of `resource`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn list(&self, resource: &str, query: Option<&QueryParams>) -> Result<Value, ClientError> {
        let op = self.resolve(resource, Action::List, &PathParams::new())?;
        let options = RequestOptions::new().params(query.cloned().unwrap_or_default());
        self.executor.execute(HttpMethod::Get.as_str(), &op.path, options)
    }

    /// GET a single resource.
    ///
    /// A query string on a URL target is sent along.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn retrieve(&self, resource: &str, target: &ResourceRef) -> Result<Value, ClientError> {
        let (path, query) = self.route(resource, Action::Read, target)?;
        self.executor
            .execute(HttpMethod::Get.as_str(), &path, RequestOptions::new().params(query))
    }

    /// POST a new resource.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn create(&self, resource: &str, data: &Value) -> Result<Value, ClientError> {
        let op = self.resolve(resource, Action::Create, &PathParams::new())?;
        self.executor.execute(
            HttpMethod::Post.as_str(),
            &op.path,
            RequestOptions::new().data(data.clone()),
        )
    }

    /// PUT a full replacement.
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
        let (path, query) = self.route(resource, Action::Update, target)?;
        self.executor.execute(
            HttpMethod::Put.as_str(),
            &path,
            RequestOptions::new().data(data.clone()).params(query),
        )
    }

    /// PATCH selected fields.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on HTTP failure, or `UnresolvableOperation` when
    /// the resolved route needs a parameter the update doesn't carry (no
    /// target given). A resource that can't be resolved at all falls back to
    /// the naive `{resource}/{uuid}` path instead of erroring.
    pub fn partial_update(
        &self,
        resource: &str,
        update: PartialUpdate,
    ) -> Result<Value, ClientError> {
        let (path, query) = self.partial_update_route(resource, &update)?;
        self.executor.execute(
            HttpMethod::Patch.as_str(),
            &path,
            RequestOptions::new().data(update.body()).params(query),
        )
    }

    fn partial_update_route(
        &self,
        resource: &str,
        update: &PartialUpdate,
    ) -> Result<(String, QueryParams), ClientError> {
        if let Some(ResourceRef::Url(url)) = &update.target {
            return Ok(self.normalizer.extract_query_params(url));
        }

        let mut params = update
            .target
            .as_ref()
            .map(ResourceRef::path_params)
            .unwrap_or_default();
        if let Some((parent, parent_uuid)) = &update.parent {
            params.insert(format!("{parent}_uuid"), parent_uuid.as_str());
        }

        let operation_id = format!("{resource}_{}", Action::PartialUpdate.suffix());
        let path = match self.resolver.resolve(&operation_id, &params) {
            Resolution::SchemaResolved(op) => filled(&operation_id, op)?.path,
            Resolution::Inferred(op) => {
                let op = filled(&operation_id, op)?;
                match &update.parent {
                    Some((parent, parent_uuid)) => {
                        let parents = self.resolver.pluralizer().pluralize(parent);
                        join_path(&[parents.as_str(), parent_uuid.as_str(), op.path.as_str()])
                    }
                    None => op.path,
                }
            }
            Resolution::Unresolved => {
                tracing::debug!(resource, "partial update route unresolved, using naive path");
                join_path(&[resource, params.get("uuid").unwrap_or_default()])
            }
        };
        Ok((path, QueryParams::new()))
    }

    /// DELETE a resource. Without a target the bare resource path is used.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on resolution or HTTP failure.
    pub fn delete(&self, resource: &str, target: Option<&ResourceRef>) -> Result<(), ClientError> {
        let (path, query) = match target {
            Some(target) => self.route(resource, Action::Delete, target)?,
            None => (resource.to_string(), QueryParams::new()),
        };
        self.executor.execute(
            HttpMethod::Delete.as_str(),
            &path,
            RequestOptions::new().params(query),
        )?;
        Ok(())
    }
}
