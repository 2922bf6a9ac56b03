pub mod manager;
pub mod memory;
pub mod postgres;
pub mod record_id;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use record_id::{InvalidRecordId, RecordId};
pub use store::{document_id, with_id, Document, DocumentStore, StoreHandle};
