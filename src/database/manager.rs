use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

use crate::config::{CollectionConfig, DatabaseConfig};
use crate::database::memory::MemoryDocumentStore;
use crate::database::postgres::PgDocumentStore;
use crate::database::store::StoreHandle;
use crate::filter::FilterError;

/// Errors from document stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Malformed stored document: {0}")]
    MalformedDocument(String),

    #[error("Store is closed")]
    Closed,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<FilterError> for DatabaseError {
    fn from(err: FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

/// Opens the store the process runs against
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect to PostgreSQL using `config.url`, or fall back to an in-memory
    /// store when `in_memory` is set.
    pub async fn open(
        config: &DatabaseConfig,
        collections: &CollectionConfig,
        in_memory: bool,
    ) -> Result<StoreHandle, DatabaseError> {
        if in_memory {
            info!("Using in-memory document store");
            return Ok(Arc::new(MemoryDocumentStore::new()));
        }

        let url = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        let store = PgDocumentStore::new(pool);
        store.ensure_collections(&collections.all()).await?;
        info!("Connected to PostgreSQL document store");
        Ok(Arc::new(store))
    }
}
