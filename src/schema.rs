//! Parsed OpenAPI documents.

use serde_json::Value;

use crate::types::OperationDescriptor;

/// Operation keys of an OAS path item. Other keys (`parameters`, `summary`,
/// `servers`, ...) never hold operations.
const PATH_ITEM_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// An immutable OpenAPI document.
///
/// Only the `paths` section is interpreted; everything else is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    document: Value,
}

impl Schema {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// The raw document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Whether the document has a `paths` object.
    pub fn has_paths(&self) -> bool {
        self.document.get("paths").map_or(false, Value::is_object)
    }

    /// All operations declared under `paths`, in document order.
    pub fn operations(&self) -> impl Iterator<Item = OperationDescriptor> + '_ {
        self.document
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|paths| paths.iter())
            .flat_map(|(path, item)| {
                item.as_object()
                    .into_iter()
                    .flat_map(|methods| methods.iter())
                    .filter(|(method, _)| {
                        PATH_ITEM_METHODS.contains(&method.to_ascii_lowercase().as_str())
                    })
                    .filter_map(move |(method, operation)| {
                        let operation_id = operation.get("operationId")?.as_str()?;
                        Some(OperationDescriptor {
                            operation_id: operation_id.to_string(),
                            path_template: path.clone(),
                            method: method.to_ascii_uppercase(),
                        })
                    })
            })
    }

    /// Find the operation with the given `operationId`.
    pub fn find_operation(&self, operation_id: &str) -> Option<OperationDescriptor> {
        self.operations()
            .find(|op| op.operation_id == operation_id)
    }
}

impl From<Value> for Schema {
    fn from(document: Value) -> Self {
        Self::new(document)
    }
}
