mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use common::object;
use creator_api::database::{
    Document, DatabaseError, DocumentStore, MemoryDocumentStore, RecordId, StoreHandle,
};
use creator_api::filter::FindQuery;
use creator_api::pagination::{PageRequest, PageResult, Paginator};
use creator_api::services::ServiceError;

const COLLECTION: &str = "Consume";

async fn seeded(names: &[String]) -> Result<(StoreHandle, Vec<RecordId>)> {
    let store: StoreHandle = Arc::new(MemoryDocumentStore::new());
    let mut ids = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let doc = object(json!({ "name": name, "description": format!("d{:02}", 22 - i) }));
        ids.push(store.insert_one(COLLECTION, doc).await?);
    }
    Ok((store, ids))
}

/// 23 records with repeated names so the identifier tiebreak matters
fn fixture_names() -> Vec<String> {
    (0..23).map(|i| format!("item-{}", i % 8)).collect()
}

fn ids_of(page: &PageResult) -> Vec<String> {
    page.items.iter().map(|d| d["_id"].as_str().unwrap().to_string()).collect()
}

async fn sweep(paginator: &Paginator, first: PageRequest) -> Result<Vec<String>> {
    let mut seen = Vec::new();
    let mut request = first;
    loop {
        let page = paginator.fetch(&request).await?;
        assert_eq!(page.has_more, page.next_cursor.is_some());
        assert!((page.items.len() as i64) <= request.limit);
        seen.extend(ids_of(&page));
        match page.next_cursor {
            Some(cursor) => request = request.after(cursor.to_hex()),
            None => return Ok(seen),
        }
    }
}

#[tokio::test]
async fn full_sweeps_visit_every_record_once_in_order() -> Result<()> {
    let names = fixture_names();
    let (store, ids) = seeded(&names).await?;
    let paginator = Paginator::new(store, COLLECTION);

    let mut expected: Vec<(String, String)> = names
        .iter()
        .cloned()
        .zip(ids.iter().map(|id| id.to_hex()))
        .collect();
    expected.sort();
    let expected: Vec<String> = expected.into_iter().map(|(_, id)| id).collect();

    for limit in [1, 7, 100] {
        let seen = sweep(&paginator, PageRequest::first(limit)).await?;
        assert_eq!(seen, expected, "ascending sweep with limit {}", limit);
    }

    let mut descending = expected.clone();
    descending.reverse();
    let seen = sweep(&paginator, PageRequest::first(7).sorted_by("name", "desc")).await?;
    assert_eq!(seen, descending);
    Ok(())
}

#[tokio::test]
async fn sweep_by_description_has_no_repeats() -> Result<()> {
    let (store, ids) = seeded(&fixture_names()).await?;
    let paginator = Paginator::new(store, COLLECTION);

    let seen = sweep(&paginator, PageRequest::first(4).sorted_by("description", "asc")).await?;
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), ids.len());
    // descriptions count down, so ascending description is reverse insertion
    let mut expected: Vec<String> = ids.iter().map(|id| id.to_hex()).collect();
    expected.reverse();
    assert_eq!(seen, expected);
    Ok(())
}

#[tokio::test]
async fn eleven_controls_split_ten_and_one() -> Result<()> {
    let names: Vec<String> = (0..=10).map(|i| format!("control{}", i)).collect();
    let (store, ids) = seeded(&names).await?;
    let paginator = Paginator::new(store, COLLECTION);

    let first = paginator.fetch(&PageRequest::first(10)).await?;
    assert_eq!(first.items.len(), 10);
    assert!(first.has_more);
    assert_eq!(first.next_cursor, Some(ids[8]));
    assert_eq!(first.items[9]["name"], "control8");

    let second = paginator
        .fetch(&PageRequest::first(10).after(ids[8].to_hex()))
        .await?;
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0]["name"], "control9");
    assert!(!second.has_more);
    assert_eq!(second.next_cursor, None);
    Ok(())
}

#[tokio::test]
async fn name_filter_is_case_insensitive_substring() -> Result<()> {
    let names: Vec<String> = ["Alpha-Test", "beta", "TESTING", "gamma.test", "a.b"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let (store, _) = seeded(&names).await?;
    let paginator = Paginator::new(store, COLLECTION);

    let page = paginator.fetch(&PageRequest::first(10).named("test")).await?;
    let found: Vec<_> = page.items.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(found, vec!["Alpha-Test", "TESTING", "gamma.test"]);

    // the needle is literal text, not a pattern
    let page = paginator.fetch(&PageRequest::first(10).named(".")).await?;
    let found: Vec<_> = page.items.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(found, vec!["a.b", "gamma.test"]);
    Ok(())
}

#[tokio::test]
async fn cursor_position_follows_the_current_sort_key() -> Result<()> {
    let names: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
    let (store, ids) = seeded(&names).await?;
    let paginator = Paginator::new(store.clone(), COLLECTION);

    let first = paginator.fetch(&PageRequest::first(2)).await?;
    assert_eq!(first.next_cursor, Some(ids[1]));

    // renaming the cursor record moves the anchor past the remaining records
    store
        .update_by_id(COLLECTION, &ids[1], object(json!({ "name": "z" })))
        .await?;
    let second = paginator.fetch(&PageRequest::first(2).after(ids[1].to_hex())).await?;
    assert!(second.items.is_empty());
    assert!(!second.has_more);
    assert_eq!(second.next_cursor, None);

    // by description the same cursor still resumes where the record sits
    let by_description = paginator
        .fetch(&PageRequest::first(10).sorted_by("description", "desc").after(ids[1].to_hex()))
        .await?;
    assert_eq!(ids_of(&by_description), vec![ids[2].to_hex(), ids[3].to_hex(), ids[4].to_hex()]);
    Ok(())
}

#[tokio::test]
async fn limit_bounds_are_inclusive() -> Result<()> {
    let (store, _) = seeded(&fixture_names()).await?;
    let paginator = Paginator::new(store, COLLECTION);

    for limit in [0, 101] {
        assert!(matches!(
            paginator.fetch(&PageRequest::first(limit)).await,
            Err(ServiceError::InvalidArgument(_))
        ));
    }
    assert_eq!(paginator.fetch(&PageRequest::first(1)).await?.items.len(), 1);
    let all = paginator.fetch(&PageRequest::first(100)).await?;
    assert_eq!(all.items.len(), 23);
    assert!(!all.has_more);
    Ok(())
}

#[tokio::test]
async fn sort_field_and_order_are_validated() -> Result<()> {
    let (store, _) = seeded(&fixture_names()).await?;
    let paginator = Paginator::new(store, COLLECTION);

    let err = paginator
        .fetch(&PageRequest::first(10).sorted_by("_id", "asc"))
        .await
        .unwrap_err();
    match err {
        ServiceError::InvalidArgument(msg) => {
            assert!(msg.contains("name"));
            assert!(msg.contains("description"));
        }
        other => panic!("unexpected error {:?}", other),
    }

    assert_eq!(
        paginator.fetch(&PageRequest::first(10).sorted_by("name", "ASC")).await,
        Err(ServiceError::invalid_argument("order must be 'asc' or 'desc'"))
    );
    Ok(())
}

#[tokio::test]
async fn unknown_cursor_is_rejected() -> Result<()> {
    let (store, _) = seeded(&fixture_names()).await?;
    let paginator = Paginator::new(store, COLLECTION);

    let stranger = RecordId::generate().to_hex();
    assert_eq!(
        paginator.fetch(&PageRequest::first(10).after(stranger)).await,
        Err(ServiceError::invalid_argument(
            "after_id does not reference an existing record"
        ))
    );
    Ok(())
}

/// Store that counts calls and holds nothing
#[derive(Default)]
struct SpyStore {
    calls: AtomicUsize,
}

impl SpyStore {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for SpyStore {
    async fn find(&self, _: &str, _: &FindQuery) -> Result<Vec<Document>, DatabaseError> {
        self.touch();
        Ok(vec![])
    }

    async fn insert_one(&self, _: &str, _: Document) -> Result<RecordId, DatabaseError> {
        self.touch();
        Ok(RecordId::generate())
    }

    async fn find_one_by_id(&self, _: &str, _: &RecordId) -> Result<Option<Document>, DatabaseError> {
        self.touch();
        Ok(None)
    }

    async fn update_by_id(&self, _: &str, _: &RecordId, _: Document) -> Result<Option<Document>, DatabaseError> {
        self.touch();
        Ok(None)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.touch();
        Ok(())
    }

    async fn close(&self) {}
}

#[tokio::test]
async fn invalid_requests_never_reach_the_store() -> Result<()> {
    let spy = Arc::new(SpyStore::default());
    let paginator = Paginator::new(spy.clone(), COLLECTION);

    let rejected = [
        PageRequest::first(10).after("not-a-valid-id"),
        PageRequest::first(10).after("ZZZZZZZZZZZZZZZZZZZZZZZZ"),
        PageRequest::first(0),
        PageRequest::first(10).sorted_by("status", "asc"),
        PageRequest::first(10).sorted_by("name", "up"),
    ];
    for request in rejected {
        assert!(matches!(
            paginator.fetch(&request).await,
            Err(ServiceError::InvalidArgument(_))
        ));
    }
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);

    let page = paginator.fetch(&PageRequest::first(10)).await?;
    assert!(page.items.is_empty());
    assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn closed_store_surfaces_as_internal_error() -> Result<()> {
    let (store, _) = seeded(&fixture_names()).await?;
    store.close().await;
    let paginator = Paginator::new(store, COLLECTION);

    assert!(matches!(
        paginator.fetch(&PageRequest::first(10)).await,
        Err(ServiceError::Internal(_))
    ));
    Ok(())
}
