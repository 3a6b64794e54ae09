//! ZGW Client
//!
//! Resource-oriented client for OpenAPI-described REST APIs whose operation
//! ids follow the `{resource}_{action}` convention.
//!
//! A CRUD call on a named resource is routed through the service's OpenAPI
//! document when one can be loaded, and inferred from the operation id
//! otherwise.
//!
//! # Example
//!
//! ```
//! use zgw_client::{OperationResolver, PathParams};
//!
//! // No schema bound: the route is inferred.
//! let resolver = OperationResolver::new(None);
//! let op = resolver
//!     .resolve_operation("zaak_read", &PathParams::uuid("123"))
//!     .unwrap();
//!
//! assert_eq!(op.path, "zaken/123");
//! assert_eq!(op.method, "GET");
//! ```
//!
//! # Inferred Routes
//!
//! | Action           | Method   | Path               |
//! |------------------|----------|--------------------|
//! | `list`           | `GET`    | `{plural}`         |
//! | `read`/`retrieve`| `GET`    | `{plural}/{uuid}`  |
//! | `create`         | `POST`   | `{plural}`         |
//! | `update`         | `PUT`    | `{plural}/{uuid}`  |
//! | `partial_update` | `PATCH`  | `{plural}/{uuid}`  |
//! | `delete`         | `DELETE` | `{plural}/{uuid}`  |
//!
//! # Errors
//!
//! Every operation returns [`ClientError`]. HTTP failures carry the parsed
//! error body:
//! ```json
//! { "status": 404, "body": { "detail": "Niet gevonden." } }
//! ```

mod auth;
mod client;
mod crud;
mod error;
mod executor;
mod loader;
mod normalize;
mod pluralize;
mod registry;
mod resolver;
mod response;
mod schema;
mod transport;
mod types;

pub use auth::{ApiToken, AuthAdapter, BasicAuth, BearerToken, NoAuth, StaticHeaders};
pub use client::{Client, ClientBuilder};
pub use crud::{PartialUpdate, ResourceCrud, ResourceRef};
pub use error::{ClientError, LoadError, TransportError};
pub use executor::{OperationExecutor, RequestOptions};
pub use loader::{
    load_schema_file, load_schema_str, load_schema_url, resolve_schema_name, ExecutionMode,
    LoaderConfig, SchemaLoader, SchemaSource, DEFAULT_TIMEOUT, MODE_ENV_VAR,
};
pub use normalize::{is_full_url, join_path, UrlNormalizer};
pub use pluralize::{pluralize, singularize, Pluralizer, IRREGULAR_PLURALS};
pub use registry::SchemaRegistry;
pub use resolver::{
    split_operation_id, substitute_path_params, OperationResolver, Resolution, ResolvedOperation,
};
pub use response::{handle_response, parse_body};
pub use schema::Schema;
pub use transport::{Transport, TransportRequest, TransportResponse};
pub use types::{
    query_pairs, Action, ApiType, HttpMethod, OperationDescriptor, PathParams, QueryParams,
    QueryValue, Service,
};

#[cfg(feature = "remote")]
pub use transport::ReqwestTransport;
