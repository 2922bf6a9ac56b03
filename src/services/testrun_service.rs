use crate::auth::Principal;
use crate::database::{Document, RecordId, StoreHandle};
use crate::filter::ID_FIELD;
use crate::services::collection::{reject_restricted_fields, Collection};
use crate::services::error::ServiceError;
use crate::services::policy::{one_of, AccessPolicy, RoleSet};
use crate::types::Operation;

pub const WRITER_ROLES: &[&str] = &["admin", "developer"];

/// TestRun documents. Reading needs any role; writing needs a writer role.
pub struct TestRunService {
    docs: Collection,
    policy: AccessPolicy,
}

impl TestRunService {
    pub fn new(store: StoreHandle, collection: &str) -> Self {
        Self {
            docs: Collection::new(store, collection, "test run"),
            policy: Self::default_policy(),
        }
    }

    pub fn default_policy() -> AccessPolicy {
        AccessPolicy::role_requires()
            .require(Operation::Read, RoleSet::Any)
            .require(Operation::Create, one_of(WRITER_ROLES))
            .require(Operation::Update, one_of(WRITER_ROLES))
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn create_testrun(&self, data: Document, principal: &Principal) -> Result<RecordId, ServiceError> {
        self.policy.check(principal, Operation::Create, "test runs")?;
        self.docs.insert(data, principal).await
    }

    pub async fn get_testruns(&self, principal: &Principal) -> Result<Vec<Document>, ServiceError> {
        self.policy.check(principal, Operation::Read, "test runs")?;
        self.docs.list(principal).await
    }

    pub async fn get_testrun(&self, testrun_id: &str, principal: &Principal) -> Result<Document, ServiceError> {
        self.policy.check(principal, Operation::Read, "test runs")?;
        self.docs.get(testrun_id, principal).await
    }

    pub async fn update_testrun(
        &self,
        testrun_id: &str,
        data: Document,
        principal: &Principal,
    ) -> Result<Document, ServiceError> {
        self.policy.check(principal, Operation::Update, "test runs")?;
        reject_restricted_fields(&data, &[ID_FIELD])?;
        self.docs.update(testrun_id, data, principal).await
    }
}
