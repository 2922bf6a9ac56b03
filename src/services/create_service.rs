use crate::auth::{Breadcrumb, Principal};
use crate::database::{Document, RecordId, StoreHandle};
use crate::services::collection::Collection;
use crate::services::error::ServiceError;
use crate::services::policy::AccessPolicy;
use crate::types::Operation;

/// Create documents: a flat list, single lookup, and creation stamped with
/// `created`. No updates.
pub struct CreateService {
    docs: Collection,
    policy: AccessPolicy,
}

impl CreateService {
    pub fn new(store: StoreHandle, collection: &str) -> Self {
        Self {
            docs: Collection::new(store, collection, "create"),
            policy: AccessPolicy::AllowAll,
        }
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn create_create(
        &self,
        mut data: Document,
        principal: &Principal,
        breadcrumb: &Breadcrumb,
    ) -> Result<RecordId, ServiceError> {
        self.policy.check(principal, Operation::Create, "creates")?;
        data.insert("created".to_string(), breadcrumb.stamp());
        self.docs.insert(data, principal).await
    }

    pub async fn get_creates(&self, principal: &Principal) -> Result<Vec<Document>, ServiceError> {
        self.policy.check(principal, Operation::Read, "creates")?;
        self.docs.list(principal).await
    }

    pub async fn get_create(&self, create_id: &str, principal: &Principal) -> Result<Document, ServiceError> {
        self.policy.check(principal, Operation::Read, "creates")?;
        self.docs.get(create_id, principal).await
    }
}
