use crate::auth::{Breadcrumb, Principal};
use crate::database::{Document, RecordId, StoreHandle};
use crate::pagination::{PageRequest, PageResult, Paginator};
use crate::services::collection::{reject_restricted_fields, Collection};
use crate::services::error::ServiceError;
use crate::services::policy::AccessPolicy;
use crate::types::Operation;

/// Fields owned by the service; a PATCH may not set them
pub const RESTRICTED_FIELDS: &[&str] = &["_id", "created", "saved"];

/// Control documents: paginated listing, creation stamped with `created` and
/// `saved`, and updates that refresh `saved`.
pub struct ControlService {
    docs: Collection,
    paginator: Paginator,
    policy: AccessPolicy,
}

impl ControlService {
    pub fn new(store: StoreHandle, collection: &str) -> Self {
        Self {
            paginator: Paginator::new(store.clone(), collection),
            docs: Collection::new(store, collection, "control"),
            policy: AccessPolicy::AllowAll,
        }
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn create_control(
        &self,
        mut data: Document,
        principal: &Principal,
        breadcrumb: &Breadcrumb,
    ) -> Result<RecordId, ServiceError> {
        self.policy.check(principal, Operation::Create, "controls")?;
        let stamp = breadcrumb.stamp();
        data.insert("created".to_string(), stamp.clone());
        data.insert("saved".to_string(), stamp);
        self.docs.insert(data, principal).await
    }

    pub async fn get_controls(&self, request: &PageRequest, principal: &Principal) -> Result<PageResult, ServiceError> {
        self.policy.check(principal, Operation::Read, "controls")?;
        let page = self.paginator.fetch(request).await?;
        tracing::info!(
            "Retrieved {} controls (has_more={}) for user {}",
            page.items.len(),
            page.has_more,
            principal.user_id
        );
        Ok(page)
    }

    pub async fn get_control(&self, control_id: &str, principal: &Principal) -> Result<Document, ServiceError> {
        self.policy.check(principal, Operation::Read, "controls")?;
        self.docs.get(control_id, principal).await
    }

    pub async fn update_control(
        &self,
        control_id: &str,
        mut data: Document,
        principal: &Principal,
        breadcrumb: &Breadcrumb,
    ) -> Result<Document, ServiceError> {
        self.policy.check(principal, Operation::Update, "controls")?;
        reject_restricted_fields(&data, RESTRICTED_FIELDS)?;
        data.insert("saved".to_string(), breadcrumb.stamp());
        self.docs.update(control_id, data, principal).await
    }
}
