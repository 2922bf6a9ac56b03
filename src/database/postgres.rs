use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{debug, info};

use crate::database::manager::DatabaseError;
use crate::database::record_id::RecordId;
use crate::database::store::{with_id, Document, DocumentStore};
use crate::filter::filter::validate_collection_name;
use crate::filter::{FindQuery, ID_FIELD};

/// Document store over PostgreSQL: one `(id, doc JSONB)` table per collection.
///
/// `id` uses the "C" collation so identifier comparisons are bytewise and
/// agree with `RecordId` ordering.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create any missing collection tables
    pub async fn ensure_collections(&self, collections: &[&str]) -> Result<(), DatabaseError> {
        for collection in collections {
            validate_collection_name(collection)?;
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (id TEXT COLLATE \"C\" PRIMARY KEY, doc JSONB NOT NULL)",
                collection
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
            debug!("Ensured collection table: {}", collection);
        }
        Ok(())
    }

    fn row_to_document(row: &PgRow) -> Result<Document, DatabaseError> {
        let id: String = row.try_get("id")?;
        let id = RecordId::parse(&id).map_err(|e| DatabaseError::MalformedDocument(e.to_string()))?;
        match row.try_get::<Value, _>("doc")? {
            Value::Object(map) => Ok(with_id(&id, map)),
            other => Err(DatabaseError::MalformedDocument(format!(
                "document {} is not an object: {}",
                id, other
            ))),
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>, DatabaseError> {
        let sql_result = query.to_sql(collection)?;
        debug!("find on {}: {}", collection, sql_result.query);

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = q.bind(p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_document).collect()
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<RecordId, DatabaseError> {
        validate_collection_name(collection)?;
        doc.remove(ID_FIELD);
        let id = RecordId::generate();

        let sql = format!("INSERT INTO \"{}\" (id, doc) VALUES ($1, $2)", collection);
        sqlx::query(&sql)
            .bind(id.to_hex())
            .bind(Value::Object(doc))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_one_by_id(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, DatabaseError> {
        validate_collection_name(collection)?;
        let sql = format!("SELECT id, doc FROM \"{}\" WHERE id = $1", collection);
        let row = sqlx::query(&sql).bind(id.to_hex()).fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &RecordId,
        mut patch: Document,
    ) -> Result<Option<Document>, DatabaseError> {
        validate_collection_name(collection)?;
        patch.remove(ID_FIELD);

        // jsonb || jsonb replaces top-level keys, which is the $set contract
        let sql = format!(
            "UPDATE \"{}\" SET doc = doc || $2 WHERE id = $1 RETURNING id, doc",
            collection
        );
        let row = sqlx::query(&sql)
            .bind(id.to_hex())
            .bind(Value::Object(patch))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
