use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::{Document, RecordId};

/// Name of the identifier field on every stored document
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse the query-string form. Only the exact lowercase words are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Comparison operator selecting rows that come after a bound in this direction
    pub fn after_operator(&self) -> &'static str {
        match self {
            SortDirection::Asc => ">",
            SortDirection::Desc => "<",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self { field: field.into(), direction }
    }
}

/// Position of the last record a client has seen, in `(sort key, _id)` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyset {
    pub field: String,
    pub value: String,
    pub id: RecordId,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Case-insensitive literal substring match on a text field
    Contains { field: String, needle: String },
    /// Records strictly after the keyset position in its direction
    After(Keyset),
}

/// Conjunction of conditions; an empty filter matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocFilter {
    pub conditions: Vec<Condition>,
}

impl DocFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.conditions.push(Condition::Contains {
            field: field.into(),
            needle: needle.into(),
        });
        self
    }

    pub fn after(mut self, keyset: Keyset) -> Self {
        self.conditions.push(Condition::After(keyset));
        self
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}

/// Text used to order a document by `field`.
///
/// Strings sort by their contents, other scalars by their JSON text, and a
/// missing or null field sorts as the empty string. The SQL store renders the
/// same key with `COALESCE(doc->>'field', '')`.
pub fn sort_key_of(doc: &Document, field: &str) -> String {
    match doc.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
