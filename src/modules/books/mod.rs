//! Book records: validation, the store seam, and the repository on top.

pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod models;
pub mod mongo;
pub mod repository;
pub mod status;
pub mod store;

pub use error::{BookError, BookResult, StoreError};
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryBookStore;
pub use models::{Book, BookId, BookPatch, DeleteOutcome, NewBook, SearchField, UpdateOutcome};
pub use mongo::MongoBookStore;
pub use repository::BookRepository;
pub use status::{normalize_status, Status};
pub use store::{BookStore, UpdateCounts};

use shelf_db::DbError;
use shelf_kernel::DatabaseSettings;

/// Connect to the configured collection and wrap it in a repository.
pub async fn open(settings: &DatabaseSettings) -> Result<BookRepository<MongoBookStore>, DbError> {
    let books = shelf_db::acquire_collection::<Book>(settings).await?;

    tracing::info!(
        module = "books",
        database = %settings.name,
        collection = %settings.collection,
        "books repository ready"
    );

    Ok(BookRepository::new(MongoBookStore::new(books)))
}
