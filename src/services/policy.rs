use crate::auth::Principal;
use crate::services::error::ServiceError;
use crate::types::Operation;

/// Which roles satisfy a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSet {
    /// Any role at all; only callers with an empty role list fail
    Any,
    /// At least one of the listed roles
    OneOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRule {
    pub operation: Operation,
    pub roles: RoleSet,
}

/// Permission check applied by every domain service before it touches the store.
///
/// Operations without a rule are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    AllowAll,
    RoleRequires(Vec<RoleRule>),
}

impl AccessPolicy {
    pub fn role_requires() -> Self {
        AccessPolicy::RoleRequires(vec![])
    }

    /// Add a rule; only meaningful on `RoleRequires`
    pub fn require(self, operation: Operation, roles: RoleSet) -> Self {
        match self {
            AccessPolicy::AllowAll => AccessPolicy::RoleRequires(vec![RoleRule { operation, roles }]),
            AccessPolicy::RoleRequires(mut rules) => {
                rules.push(RoleRule { operation, roles });
                AccessPolicy::RoleRequires(rules)
            }
        }
    }

    pub fn check(&self, principal: &Principal, operation: Operation, noun: &str) -> Result<(), ServiceError> {
        let AccessPolicy::RoleRequires(rules) = self else {
            return Ok(());
        };
        for rule in rules.iter().filter(|r| r.operation == operation) {
            let allowed = match &rule.roles {
                RoleSet::Any => !principal.roles.is_empty(),
                RoleSet::OneOf(roles) => roles.iter().any(|r| principal.has_role(r)),
            };
            if !allowed {
                tracing::info!(
                    "Denied {} on {} for user {}",
                    operation.as_str(),
                    noun,
                    principal.user_id
                );
                return Err(ServiceError::forbidden(format!(
                    "Insufficient permissions to {} {}",
                    operation.as_str(),
                    noun
                )));
            }
        }
        Ok(())
    }
}

pub fn one_of(roles: &[&str]) -> RoleSet {
    RoleSet::OneOf(roles.iter().map(|r| r.to_string()).collect())
}
