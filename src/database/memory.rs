use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::record_id::RecordId;
use crate::database::store::{with_id, Document, DocumentStore};
use crate::filter::filter_order::FilterOrder;
use crate::filter::filter_where::FilterWhere;
use crate::filter::{FindQuery, ID_FIELD};

/// In-process document store used for local runs and tests.
///
/// Identifiers are the store's creation time followed by a counter, so they
/// increase strictly in insertion order.
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<RecordId, Document>>>,
    epoch: u32,
    counter: AtomicU64,
    closed: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        let epoch = chrono::Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        Self {
            collections: RwLock::new(HashMap::new()),
            epoch,
            counter: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    fn next_id(&self) -> RecordId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&self.epoch.to_be_bytes());
        bytes[4..].copy_from_slice(&n.to_be_bytes());
        RecordId::from_bytes(bytes)
    }

    fn ensure_open(&self) -> Result<(), DatabaseError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DatabaseError::Closed);
        }
        Ok(())
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, DatabaseError> {
        self.ensure_open()?;
        FilterWhere::validate(&query.filter)?;

        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(vec![]);
        };

        let mut matched: Vec<(&RecordId, &Document)> = docs
            .iter()
            .filter(|(id, doc)| FilterWhere::matches(&query.filter, id, doc))
            .collect();
        // Stable sort: ties keep identifier order from the BTreeMap
        matched.sort_by(|a, b| FilterOrder::compare(&query.sort, *a, *b));

        let limit = match query.limit {
            Some(l) if l < 0 => return Err(DatabaseError::QueryError("Limit must be non-negative".to_string())),
            Some(l) => l as usize,
            None => usize::MAX,
        };

        Ok(matched
            .into_iter()
            .take(limit)
            .map(|(id, doc)| with_id(id, doc.clone()))
            .collect())
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<RecordId, DatabaseError> {
        self.ensure_open()?;
        doc.remove(ID_FIELD);
        let id = self.next_id();
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().insert(id, doc);
        Ok(id)
    }

    async fn find_one_by_id(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, DatabaseError> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| with_id(id, doc.clone())))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &RecordId,
        mut patch: Document,
    ) -> Result<Option<Document>, DatabaseError> {
        self.ensure_open()?;
        patch.remove(ID_FIELD);
        let mut collections = self.collections.write().await;
        let Some(doc) = collections.get_mut(collection).and_then(|docs| docs.get_mut(id)) else {
            return Ok(None);
        };
        for (key, value) in patch {
            doc.insert(key, value);
        }
        Ok(Some(with_id(id, doc.clone())))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
