//! Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Operations a domain service performs on behalf of a caller.
/// Access policies are keyed on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
        }
    }
}
