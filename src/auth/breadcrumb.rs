use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::Principal;

/// Address recorded when the request origin is unknown (proxies, tests)
pub const DEFAULT_FROM_IP: &str = "127.0.0.1";

/// Audit context attached to every authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub at_time: DateTime<Utc>,
    pub by_user: String,
    pub from_ip: Option<String>,
    pub correlation_id: String,
}

impl Breadcrumb {
    pub fn new(principal: &Principal, from_ip: Option<String>, correlation_id: Option<String>) -> Self {
        Self {
            at_time: Utc::now(),
            by_user: principal.user_id.clone(),
            from_ip: from_ip.filter(|ip| !ip.is_empty()),
            correlation_id: correlation_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }

    /// The `created` / `saved` value written onto documents
    pub fn stamp(&self) -> Value {
        json!({
            "from_ip": self.from_ip.as_deref().unwrap_or(DEFAULT_FROM_IP),
            "at_time": self.at_time,
            "by_user": self.by_user,
            "correlation_id": self.correlation_id,
        })
    }
}
