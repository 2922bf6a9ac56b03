use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::database::manager::DatabaseError;
use crate::database::record_id::RecordId;
use crate::filter::{FindQuery, ID_FIELD};

/// A stored record: a JSON object whose `_id` is the hex identifier
pub type Document = Map<String, Value>;

/// Shared handle to the process's document store, opened once in `main`
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Document persistence over named collections.
///
/// Implementations must return documents with `_id` set, honour the filter,
/// sort keys and limit of a `FindQuery` exactly as `FilterWhere::matches` and
/// `FilterOrder::compare` define them, and treat `update_by_id` as a shallow
/// top-level merge.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, DatabaseError>;

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<RecordId, DatabaseError>;

    async fn find_one_by_id(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, DatabaseError>;

    async fn update_by_id(
        &self,
        collection: &str,
        id: &RecordId,
        patch: Document,
    ) -> Result<Option<Document>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self);
}

/// Read the `_id` of a document returned by a store
pub fn document_id(doc: &Document) -> Option<RecordId> {
    doc.get(ID_FIELD)
        .and_then(|v| v.as_str())
        .and_then(|s| RecordId::parse(s).ok())
}

/// Attach the identifier as the first-class `_id` field
pub fn with_id(id: &RecordId, mut doc: Document) -> Document {
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
    doc
}
