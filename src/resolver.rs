//! Operation resolution - maps operation ids to `(path, method)` pairs.
//!
//! The bound schema is consulted first. When it has no matching
//! `operationId` (or there is no schema), the route is inferred from the
//! `{resource}_{action}` naming convention.

use std::sync::Arc;

use crate::error::ClientError;
use crate::pluralize::Pluralizer;
use crate::schema::Schema;
use crate::types::{Action, PathParams, ACTION_SUFFIXES};

/// A routed operation, with path parameters substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOperation {
    /// Path relative to the base URL, without leading slash.
    pub path: String,
    /// Uppercased HTTP method.
    pub method: String,
}

impl ResolvedOperation {
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}

/// Outcome of resolving an operation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Found in the bound schema.
    SchemaResolved(ResolvedOperation),
    /// Derived from the operation id naming convention.
    Inferred(ResolvedOperation),
    /// Neither the schema nor the naming convention applies.
    Unresolved,
}

impl Resolution {
    pub fn operation(&self) -> Option<&ResolvedOperation> {
        match self {
            Resolution::SchemaResolved(op) | Resolution::Inferred(op) => Some(op),
            Resolution::Unresolved => None,
        }
    }

    pub fn into_operation(self) -> Option<ResolvedOperation> {
        match self {
            Resolution::SchemaResolved(op) | Resolution::Inferred(op) => Some(op),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_inferred(&self) -> bool {
        matches!(self, Resolution::Inferred(_))
    }
}

/// Split `{resource}_{action}` on the first matching action suffix.
///
/// Suffixes are tried longest first, so `zaak_partial_update` is a
/// `PartialUpdate` of `zaak`. A resource that itself ends in an action token
/// keeps it: `update_update` is an `Update` of `update`. The first suffix
/// that matches decides; an empty resource is not retried with a shorter one.
pub fn split_operation_id(operation_id: &str) -> Option<(&str, Action)> {
    let (resource, action) = ACTION_SUFFIXES.iter().find_map(|action| {
        let resource = operation_id
            .strip_suffix(action.suffix())?
            .strip_suffix('_')?;
        Some((resource, *action))
    })?;
    (!resource.is_empty()).then_some((resource, action))
}

/// Replace every `{key}` in `template` with the matching parameter.
///
/// Placeholders without a parameter are left untouched.
pub fn substitute_path_params(template: &str, params: &PathParams) -> String {
    params.iter().fold(template.to_string(), |path, (key, value)| {
        path.replace(&format!("{{{key}}}"), value)
    })
}

/// Resolves operation ids against an optional schema.
#[derive(Debug, Clone, Default)]
pub struct OperationResolver {
    schema: Option<Arc<Schema>>,
    pluralizer: Pluralizer,
}

impl OperationResolver {
    pub fn new(schema: Option<Arc<Schema>>) -> Self {
        Self {
            schema,
            pluralizer: Pluralizer::default(),
        }
    }

    pub fn with_pluralizer(mut self, pluralizer: Pluralizer) -> Self {
        self.pluralizer = pluralizer;
        self
    }

    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    pub fn pluralizer(&self) -> &Pluralizer {
        &self.pluralizer
    }

    /// Resolve an operation id, reporting which branch produced the route.
    pub fn resolve(&self, operation_id: &str, params: &PathParams) -> Resolution {
        if let Some(op) = self.resolve_from_schema(operation_id, params) {
            tracing::debug!(operation_id, path = %op.path, "resolved from schema");
            return Resolution::SchemaResolved(op);
        }
        match self.infer(operation_id, params) {
            Some(op) => {
                tracing::debug!(operation_id, path = %op.path, "inferred route");
                Resolution::Inferred(op)
            }
            None => Resolution::Unresolved,
        }
    }

    /// Resolve an operation id to a `(path, method)` pair.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnresolvableOperation` when neither the schema
    /// nor inference yields a route.
    pub fn resolve_operation(
        &self,
        operation_id: &str,
        params: &PathParams,
    ) -> Result<ResolvedOperation, ClientError> {
        self.resolve(operation_id, params)
            .into_operation()
            .ok_or_else(|| ClientError::UnresolvableOperation {
                operation_id: operation_id.to_string(),
            })
    }

    pub fn supports_operation(&self, operation_id: &str) -> bool {
        self.resolve(operation_id, &PathParams::new()) != Resolution::Unresolved
    }

    fn resolve_from_schema(
        &self,
        operation_id: &str,
        params: &PathParams,
    ) -> Option<ResolvedOperation> {
        let schema = self.schema.as_ref().filter(|s| s.has_paths())?;
        let op = schema.find_operation(operation_id)?;
        let path = substitute_path_params(&op.path_template, params);
        Some(ResolvedOperation::new(
            path.trim_start_matches('/'),
            op.method,
        ))
    }

    fn infer(&self, operation_id: &str, params: &PathParams) -> Option<ResolvedOperation> {
        let (resource, action) = split_operation_id(operation_id)?;
        let plural = self.pluralizer.pluralize(resource);
        let template = if action.is_item() {
            format!("{plural}/{{uuid}}")
        } else {
            plural
        };
        Some(ResolvedOperation::new(
            substitute_path_params(&template, params),
            action.method().as_str(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn inferring() -> OperationResolver {
        OperationResolver::new(None)
    }

    #[rstest]
    #[case("zaak_list", "zaken", "GET")]
    #[case("zaak_read", "zaken/{uuid}", "GET")]
    #[case("zaak_retrieve", "zaken/{uuid}", "GET")]
    #[case("zaak_create", "zaken", "POST")]
    #[case("zaak_update", "zaken/{uuid}", "PUT")]
    #[case("zaak_partial_update", "zaken/{uuid}", "PATCH")]
    #[case("zaak_delete", "zaken/{uuid}", "DELETE")]
    fn inference_table(#[case] operation_id: &str, #[case] path: &str, #[case] method: &str) {
        let resolution = inferring().resolve(operation_id, &PathParams::new());
        assert_eq!(
            resolution,
            Resolution::Inferred(ResolvedOperation::new(path, method))
        );
    }

    #[test]
    fn irregular_plural_is_used() {
        let op = inferring()
            .resolve_operation("catalogus_list", &PathParams::new())
            .unwrap();
        assert_eq!(op, ResolvedOperation::new("catalogussen", "GET"));
    }

    #[test]
    fn uuid_is_substituted() {
        let op = inferring()
            .resolve_operation("zaak_read", &PathParams::uuid("123"))
            .unwrap();
        assert_eq!(op, ResolvedOperation::new("zaken/123", "GET"));
    }

    #[test]
    fn multi_word_resource() {
        let op = inferring()
            .resolve_operation("enkelvoudiginformatieobject_partial_update", &PathParams::uuid("x"))
            .unwrap();
        assert_eq!(
            op,
            ResolvedOperation::new("enkelvoudiginformatieobjecten/x", "PATCH")
        );
    }

    #[test]
    fn split_prefers_partial_update() {
        assert_eq!(
            split_operation_id("zaak_partial_update"),
            Some(("zaak", Action::PartialUpdate))
        );
    }

    #[test]
    fn split_resource_named_like_action() {
        assert_eq!(split_operation_id("update_update"), Some(("update", Action::Update)));
        assert_eq!(split_operation_id("list_read"), Some(("list", Action::Read)));
        assert_eq!(
            split_operation_id("document_list_list"),
            Some(("document_list", Action::List))
        );
        // "partial" is the resource here, not part of the action.
        assert_eq!(
            split_operation_id("partial_update"),
            Some(("partial", Action::Update))
        );
    }

    #[test]
    fn split_requires_separator_and_resource() {
        assert_eq!(split_operation_id("zaaklist"), None);
        assert_eq!(split_operation_id("_list"), None);
        assert_eq!(split_operation_id("_partial_update"), None);
        assert_eq!(split_operation_id("list"), None);
        assert_eq!(split_operation_id("zaak_archive"), None);
    }

    #[test]
    fn unresolvable_operation_errors() {
        let result = inferring().resolve_operation("zaak_archive", &PathParams::new());
        assert!(matches!(
            result,
            Err(ClientError::UnresolvableOperation { ref operation_id }) if operation_id == "zaak_archive"
        ));
        assert!(!inferring().supports_operation("zaak_archive"));
        assert!(inferring().supports_operation("zaak_list"));
    }

    #[test]
    fn substitute_leaves_unknown_placeholders() {
        let params = PathParams::from([("zaak_uuid", "1")]);
        assert_eq!(
            substitute_path_params("zaken/{zaak_uuid}/rollen/{uuid}", &params),
            "zaken/1/rollen/{uuid}"
        );
    }

    fn schema_resolver() -> OperationResolver {
        let schema = Schema::new(json!({
            "paths": {
                "/zaken/_zoek": { "post": { "operationId": "zaak__zoek" } },
                "/zaken/overzicht": { "get": { "operationId": "zaak_list" } },
                "/zaken/{zaak_uuid}/zaakeigenschappen/{uuid}": {
                    "patch": { "operationId": "zaakeigenschap_partial_update" }
                }
            }
        }));
        OperationResolver::new(Some(Arc::new(schema)))
    }

    #[test]
    fn schema_wins_over_inference() {
        let resolution = schema_resolver().resolve("zaak_list", &PathParams::new());
        assert_eq!(
            resolution,
            Resolution::SchemaResolved(ResolvedOperation::new("zaken/overzicht", "GET"))
        );
    }

    #[test]
    fn schema_only_operation_resolves() {
        let op = schema_resolver()
            .resolve_operation("zaak__zoek", &PathParams::new())
            .unwrap();
        assert_eq!(op, ResolvedOperation::new("zaken/_zoek", "POST"));
    }

    #[test]
    fn schema_nested_params() {
        let params = PathParams::new().with("zaak_uuid", "z1").with("uuid", "e1");
        let op = schema_resolver()
            .resolve_operation("zaakeigenschap_partial_update", &params)
            .unwrap();
        assert_eq!(
            op,
            ResolvedOperation::new("zaken/z1/zaakeigenschappen/e1", "PATCH")
        );
    }

    #[test]
    fn schema_miss_falls_back_to_inference() {
        let resolution = schema_resolver().resolve("rol_read", &PathParams::uuid("r1"));
        assert_eq!(
            resolution,
            Resolution::Inferred(ResolvedOperation::new("rollen/r1", "GET"))
        );
    }

    #[test]
    fn schema_without_paths_falls_back() {
        let resolver = OperationResolver::new(Some(Arc::new(Schema::new(json!({})))));
        assert!(resolver.resolve("zaak_list", &PathParams::new()).is_inferred());
    }
}
