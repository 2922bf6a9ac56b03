use tracing::info;

use crate::auth::Principal;
use crate::database::{Document, RecordId, StoreHandle};
use crate::filter::{FindQuery, SortDirection, SortKey, ID_FIELD};
use crate::services::error::ServiceError;

/// Store access shared by the domain services: identifier parsing, not-found
/// handling and error translation for one collection.
pub struct Collection {
    store: StoreHandle,
    name: String,
    noun: &'static str,
}

impl Collection {
    /// `noun` is the singular used in messages, e.g. "control" or "test run"
    pub fn new(store: StoreHandle, name: impl Into<String>, noun: &'static str) -> Self {
        Self {
            store,
            name: name.into(),
            noun,
        }
    }

    fn not_found(&self, raw_id: &str) -> ServiceError {
        let mut noun = self.noun.to_string();
        if let Some(first) = noun.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        ServiceError::not_found(format!("{} {} not found", noun, raw_id))
    }

    /// A malformed identifier can never resolve, so it is reported as not found
    fn parse_id(&self, raw_id: &str) -> Result<RecordId, ServiceError> {
        RecordId::parse(raw_id).map_err(|_| self.not_found(raw_id))
    }

    pub async fn insert(&self, mut doc: Document, principal: &Principal) -> Result<RecordId, ServiceError> {
        doc.remove(ID_FIELD);
        let id = self
            .store
            .insert_one(&self.name, doc)
            .await
            .map_err(|e| ServiceError::store(&format!("create {}", self.noun), e))?;
        info!("Created {} {} for user {}", self.noun, id, principal.user_id);
        Ok(id)
    }

    pub async fn list(&self, principal: &Principal) -> Result<Vec<Document>, ServiceError> {
        let query = FindQuery::all().sort(vec![SortKey::new(ID_FIELD, SortDirection::Asc)]);
        let docs = self
            .store
            .find(&self.name, &query)
            .await
            .map_err(|e| ServiceError::store(&format!("retrieve {}s", self.noun), e))?;
        info!("Retrieved {} {}s for user {}", docs.len(), self.noun, principal.user_id);
        Ok(docs)
    }

    pub async fn get(&self, raw_id: &str, principal: &Principal) -> Result<Document, ServiceError> {
        let id = self.parse_id(raw_id)?;
        let doc = self
            .store
            .find_one_by_id(&self.name, &id)
            .await
            .map_err(|e| ServiceError::store(&format!("retrieve {} {}", self.noun, id), e))?;
        match doc {
            Some(doc) => {
                info!("Retrieved {} {} for user {}", self.noun, id, principal.user_id);
                Ok(doc)
            }
            None => {
                info!("{} {} not found for user {}", self.noun, id, principal.user_id);
                Err(self.not_found(raw_id))
            }
        }
    }

    pub async fn update(&self, raw_id: &str, patch: Document, principal: &Principal) -> Result<Document, ServiceError> {
        let id = self.parse_id(raw_id)?;
        let doc = self
            .store
            .update_by_id(&self.name, &id, patch)
            .await
            .map_err(|e| ServiceError::store(&format!("update {} {}", self.noun, id), e))?;
        match doc {
            Some(doc) => {
                info!("Updated {} {} for user {}", self.noun, id, principal.user_id);
                Ok(doc)
            }
            None => {
                info!("{} {} not found for update by user {}", self.noun, id, principal.user_id);
                Err(self.not_found(raw_id))
            }
        }
    }
}

/// Reject a patch that tries to set any of `restricted`
pub fn reject_restricted_fields(data: &Document, restricted: &[&str]) -> Result<(), ServiceError> {
    for field in restricted {
        if data.contains_key(*field) {
            return Err(ServiceError::forbidden(format!("Cannot update {} field", field)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDocumentStore;
    use serde_json::json;
    use std::sync::Arc;

    fn collection() -> Collection {
        Collection::new(Arc::new(MemoryDocumentStore::new()), "TestRun", "test run")
    }

    #[tokio::test]
    async fn malformed_and_missing_ids_are_not_found() {
        let c = collection();
        let user = Principal::new("u", &[]);
        assert_eq!(
            c.get("nope", &user).await,
            Err(ServiceError::not_found("Test run nope not found"))
        );
        let missing = RecordId::generate().to_hex();
        assert_eq!(
            c.update(&missing, Document::new(), &user).await,
            Err(ServiceError::not_found(format!("Test run {} not found", missing)))
        );
    }

    #[test]
    fn rejects_restricted_fields_by_name() {
        let data = json!({ "name": "x", "saved": {} }).as_object().cloned().unwrap();
        assert_eq!(
            reject_restricted_fields(&data, &["_id", "created", "saved"]),
            Err(ServiceError::forbidden("Cannot update saved field"))
        );
        assert!(reject_restricted_fields(&data, &["_id"]).is_ok());
    }
}
