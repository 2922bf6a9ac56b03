//! Cursor-based pagination for infinite-scroll list endpoints.
//!
//! A page request is validated before the store is touched, translated into
//! a keyset-bounded find ordered by `(sort_by, _id)`, and executed with one
//! record of lookahead so `has_more` needs no separate count.

use serde::{Deserialize, Serialize};

use crate::database::{document_id, Document, RecordId, StoreHandle};
use crate::filter::{sort_key_of, DocFilter, FindQuery, Keyset, SortDirection, SortKey, ID_FIELD};
use crate::services::error::ServiceError;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

/// Fields every paginated domain allows as a sort key
pub const DEFAULT_SORT_FIELDS: &[&str] = &["name", "description"];

/// Raw list query parameters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub name: Option<String>,
    pub after_id: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// A page request with defaults applied but not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub name: Option<String>,
    pub after_id: Option<String>,
    pub limit: i64,
    pub sort_by: String,
    pub order: String,
}

impl PageRequest {
    pub fn first(limit: i64) -> Self {
        Self {
            name: None,
            after_id: None,
            limit,
            sort_by: "name".to_string(),
            order: "asc".to_string(),
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after_id = Some(cursor.into());
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_by = field.into();
        self.order = order.into();
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Apply defaults to query-string input. Empty `name`/`after_id` mean absent.
    pub fn from_query(query: PageQuery, default_limit: i64) -> Result<Self, ServiceError> {
        let limit = match query.limit.as_deref().map(str::trim) {
            None | Some("") => default_limit,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ServiceError::invalid_argument("limit must be an integer"))?,
        };
        Ok(Self {
            name: query.name.filter(|s| !s.is_empty()),
            after_id: query.after_id.filter(|s| !s.is_empty()),
            limit,
            sort_by: query.sort_by.unwrap_or_else(|| "name".to_string()),
            order: query.order.unwrap_or_else(|| "asc".to_string()),
        })
    }
}

/// One page of results plus the state needed to fetch the next one.
///
/// `has_more` is true exactly when `next_cursor` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub items: Vec<Document>,
    pub limit: i64,
    pub has_more: bool,
    pub next_cursor: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidatedPage {
    name: Option<String>,
    cursor: Option<RecordId>,
    limit: i64,
    sort_by: String,
    direction: SortDirection,
}

/// Stateless paginator over one collection
pub struct Paginator {
    store: StoreHandle,
    collection: String,
    sortable: Vec<String>,
}

impl Paginator {
    pub fn new(store: StoreHandle, collection: impl Into<String>) -> Self {
        Self::with_sort_fields(store, collection, DEFAULT_SORT_FIELDS)
    }

    pub fn with_sort_fields(store: StoreHandle, collection: impl Into<String>, sortable: &[&str]) -> Self {
        Self {
            store,
            collection: collection.into(),
            sortable: sortable.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn validate(&self, request: &PageRequest) -> Result<ValidatedPage, ServiceError> {
        if request.limit < MIN_LIMIT {
            return Err(ServiceError::invalid_argument("limit must be >= 1"));
        }
        if request.limit > MAX_LIMIT {
            return Err(ServiceError::invalid_argument("limit must be <= 100"));
        }
        if !self.sortable.iter().any(|f| f == &request.sort_by) {
            return Err(ServiceError::invalid_argument(format!(
                "sort_by must be one of: {}",
                self.sortable.join(", ")
            )));
        }
        let direction = SortDirection::parse(&request.order)
            .ok_or_else(|| ServiceError::invalid_argument("order must be 'asc' or 'desc'"))?;
        let cursor = request
            .after_id
            .as_deref()
            .map(RecordId::parse)
            .transpose()
            .map_err(|_| ServiceError::invalid_argument("after_id must be a valid identifier"))?;

        Ok(ValidatedPage {
            name: request.name.clone(),
            cursor,
            limit: request.limit,
            sort_by: request.sort_by.clone(),
            direction,
        })
    }

    fn build_query(page: &ValidatedPage, anchor: Option<Keyset>) -> FindQuery {
        let mut filter = DocFilter::new();
        if let Some(name) = &page.name {
            filter = filter.contains("name", name.clone());
        }
        if let Some(keyset) = anchor {
            filter = filter.after(keyset);
        }

        FindQuery::new(filter)
            .sort(vec![
                SortKey::new(page.sort_by.clone(), page.direction),
                SortKey::new(ID_FIELD, page.direction),
            ])
            .limit(page.limit + 1)
    }

    /// Resolve the cursor identifier to its position in the requested order
    async fn anchor(&self, page: &ValidatedPage) -> Result<Option<Keyset>, ServiceError> {
        let Some(cursor) = page.cursor else {
            return Ok(None);
        };
        let record = self
            .store
            .find_one_by_id(&self.collection, &cursor)
            .await
            .map_err(|e| ServiceError::store(&format!("resolve cursor {} in {}", cursor, self.collection), e))?;
        let Some(record) = record else {
            return Err(ServiceError::invalid_argument(
                "after_id does not reference an existing record",
            ));
        };
        Ok(Some(Keyset {
            field: page.sort_by.clone(),
            value: sort_key_of(&record, &page.sort_by),
            id: cursor,
            direction: page.direction,
        }))
    }

    pub async fn fetch(&self, request: &PageRequest) -> Result<PageResult, ServiceError> {
        let page = self.validate(request)?;
        let anchor = self.anchor(&page).await?;
        let query = Self::build_query(&page, anchor);

        let mut items = self
            .store
            .find(&self.collection, &query)
            .await
            .map_err(|e| ServiceError::store(&format!("retrieve {}", self.collection), e))?;

        let limit = page.limit as usize;
        let has_more = items.len() > limit;
        let next_cursor = if has_more {
            items.truncate(limit);
            let last = items.last().and_then(document_id).ok_or_else(|| {
                tracing::error!("Page from {} ends in a record without a valid _id", self.collection);
                ServiceError::Internal(format!("Failed to retrieve {}", self.collection))
            })?;
            Some(last)
        } else {
            None
        };

        Ok(PageResult {
            items,
            limit: page.limit,
            has_more,
            next_cursor,
        })
    }
}
