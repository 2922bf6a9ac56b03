use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{DocFilter, SortKey, SqlResult};

/// A find against one collection: filter, sort keys and an optional limit.
///
/// Built the way a document driver cursor is chained:
/// `FindQuery::new(filter).sort(keys).limit(n)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: DocFilter,
    pub sort: Vec<SortKey>,
    pub limit: Option<i64>,
}

impl FindQuery {
    pub fn new(filter: DocFilter) -> Self {
        Self {
            filter,
            sort: vec![],
            limit: None,
        }
    }

    /// Every document, no ordering
    pub fn all() -> Self {
        Self::default()
    }

    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        self.sort = keys;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render a SELECT over the collection's `(id, doc)` table
    pub fn to_sql(&self, collection: &str) -> Result<SqlResult, FilterError> {
        validate_collection_name(collection)?;
        let (where_clause, params) = FilterWhere::generate(&self.filter, 0)?;
        let order_clause = FilterOrder::generate(&self.sort)?;
        let limit_clause = match self.limit {
            Some(l) if l < 0 => return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())),
            Some(l) => format!("LIMIT {}", l),
            None => String::new(),
        };

        let query = [
            "SELECT id, doc".to_string(),
            format!("FROM \"{}\"", collection),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }
}

pub fn validate_collection_name(name: &str) -> Result<(), FilterError> {
    if !is_identifier(name) {
        return Err(FilterError::InvalidCollection(format!("Invalid collection name format: {}", name)));
    }
    Ok(())
}

pub fn validate_field_name(name: &str) -> Result<(), FilterError> {
    if !is_identifier(name) {
        return Err(FilterError::InvalidField(format!("Invalid field name format: {}", name)));
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}
