use crate::auth::Principal;
use crate::database::{Document, StoreHandle};
use crate::pagination::{PageRequest, PageResult, Paginator};
use crate::services::collection::Collection;
use crate::services::error::ServiceError;
use crate::services::policy::AccessPolicy;
use crate::types::Operation;

/// Read-only access to Consume documents with cursor pagination
pub struct ConsumeService {
    docs: Collection,
    paginator: Paginator,
    policy: AccessPolicy,
}

impl ConsumeService {
    pub fn new(store: StoreHandle, collection: &str) -> Self {
        Self {
            paginator: Paginator::new(store.clone(), collection),
            docs: Collection::new(store, collection, "consume"),
            policy: AccessPolicy::AllowAll,
        }
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn get_consumes(&self, request: &PageRequest, principal: &Principal) -> Result<PageResult, ServiceError> {
        self.policy.check(principal, Operation::Read, "consumes")?;
        let page = self.paginator.fetch(request).await?;
        tracing::info!(
            "Retrieved {} consumes (has_more={}) for user {}",
            page.items.len(),
            page.has_more,
            principal.user_id
        );
        Ok(page)
    }

    pub async fn get_consume(&self, consume_id: &str, principal: &Principal) -> Result<Document, ServiceError> {
        self.policy.check(principal, Operation::Read, "consumes")?;
        self.docs.get(consume_id, principal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DocumentStore, MemoryDocumentStore};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn pages_through_seeded_documents() {
        let store = Arc::new(MemoryDocumentStore::new());
        for name in ["gamma", "alpha", "beta"] {
            let doc = json!({ "name": name }).as_object().cloned().unwrap();
            store.insert_one("Consume", doc).await.unwrap();
        }
        let svc = ConsumeService::new(store, "Consume");
        let user = Principal::new("dave", &[]);

        let first = svc.get_consumes(&PageRequest::first(2), &user).await.unwrap();
        assert_eq!(first.items[0]["name"], "alpha");
        assert_eq!(first.items[1]["name"], "beta");
        assert!(first.has_more);

        let cursor = first.next_cursor.unwrap().to_hex();
        let second = svc
            .get_consumes(&PageRequest::first(2).after(cursor), &user)
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0]["name"], "gamma");
        assert_eq!(second.next_cursor, None);
    }
}
