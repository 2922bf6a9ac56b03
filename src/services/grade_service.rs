use crate::auth::Principal;
use crate::database::{Document, StoreHandle};
use crate::services::collection::Collection;
use crate::services::error::ServiceError;
use crate::services::policy::{AccessPolicy, RoleSet};
use crate::types::Operation;

/// Read-only Grade documents. Callers need at least one role.
pub struct GradeService {
    docs: Collection,
    policy: AccessPolicy,
}

impl GradeService {
    pub fn new(store: StoreHandle, collection: &str) -> Self {
        Self {
            docs: Collection::new(store, collection, "grade"),
            policy: Self::default_policy(),
        }
    }

    pub fn default_policy() -> AccessPolicy {
        AccessPolicy::role_requires().require(Operation::Read, RoleSet::Any)
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn get_grades(&self, principal: &Principal) -> Result<Vec<Document>, ServiceError> {
        self.policy.check(principal, Operation::Read, "grades")?;
        self.docs.list(principal).await
    }

    pub async fn get_grade(&self, grade_id: &str, principal: &Principal) -> Result<Document, ServiceError> {
        self.policy.check(principal, Operation::Read, "grades")?;
        self.docs.get(grade_id, principal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDocumentStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn roleless_callers_are_forbidden() {
        let svc = GradeService::new(Arc::new(MemoryDocumentStore::new()), "Grade");
        assert_eq!(
            svc.get_grades(&Principal::new("eve", &[])).await,
            Err(ServiceError::forbidden("Insufficient permissions to read grades"))
        );
        assert_eq!(svc.get_grades(&Principal::new("eve", &["viewer"])).await, Ok(vec![]));
    }
}
